//! Endpoint publication Hardware Abstraction Layer.
//!
//! The host exposes drivers to other callers as named byte-stream nodes.
//! A driver publishes a [`FileOperations`] handler under a fixed name and
//! permission mode, and removes it again before releasing its hardware.

use crate::error::Result;
use crate::hal::user::{UserSink, UserSource};
use alloc::sync::Arc;
use bitflags::bitflags;

/// The host could not register the endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PublishError;

bitflags! {
    /// Permission bits of a published node.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Mode: u16 {
        const OWNER_READ = 0o400;
        const OWNER_WRITE = 0o200;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
    }
}

impl Mode {
    /// Read and write for everyone (0666).
    pub const READ_WRITE_ALL: Self = Self::from_bits_retain(0o666);
}

/// Read/write entry points the host invokes for a published node.
///
/// Both receive the caller's buffer and the size the caller asked for,
/// and return the number of bytes actually transferred.
pub trait FileOperations: Send + Sync {
    /// Fill the caller's buffer.
    fn read(&self, buf: &mut dyn UserSink, size: usize) -> Result<usize>;

    /// Consume the caller's buffer.
    fn write(&self, buf: &dyn UserSource, size: usize) -> Result<usize>;
}

/// Endpoint publication primitive provided by the host.
pub trait EndpointRegistry {
    /// Handle identifying a published node.
    type Endpoint;

    /// Publish `ops` under `name` with permission `mode`.
    ///
    /// # Errors
    /// Returns [`PublishError`] if the node cannot be created.
    fn publish(
        &mut self,
        name: &'static str,
        mode: Mode,
        ops: Arc<dyn FileOperations>,
    ) -> core::result::Result<Self::Endpoint, PublishError>;

    /// Remove a node. Once this returns the host no longer dispatches new
    /// requests to its handler.
    fn unpublish(&mut self, endpoint: Self::Endpoint);
}
