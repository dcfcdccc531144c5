//! Driver error taxonomy.

use thiserror::Error;

use crate::hal::endpoint::PublishError;
use crate::hal::mmio::MapError;
use crate::hal::user::CopyError;

const ENOMEM: isize = 12;
const EFAULT: isize = 14;
const ENODEV: isize = 19;

/// Errors reported by the UART driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The register window could not be mapped.
    #[error("failed to map UART memory")]
    MapFailed,

    /// The endpoint could not be published after the window was mapped.
    #[error("failed to create endpoint")]
    PublishFailed,

    /// Copying between the caller's buffer and the driver failed.
    #[error("bad address in caller buffer")]
    CopyFault,

    /// The controller was torn down while the handler was still reachable.
    #[error("UART controller is not mapped")]
    NoDevice,
}

impl DriverError {
    /// Negative errno value handed back to the host.
    pub const fn errno(self) -> isize {
        match self {
            DriverError::MapFailed | DriverError::PublishFailed => -ENOMEM,
            DriverError::CopyFault => -EFAULT,
            DriverError::NoDevice => -ENODEV,
        }
    }
}

impl From<MapError> for DriverError {
    fn from(_: MapError) -> Self {
        DriverError::MapFailed
    }
}

impl From<PublishError> for DriverError {
    fn from(_: PublishError) -> Self {
        DriverError::PublishFailed
    }
}

impl From<CopyError> for DriverError {
    fn from(_: CopyError) -> Self {
        DriverError::CopyFault
    }
}

pub type Result<T> = core::result::Result<T, DriverError>;
