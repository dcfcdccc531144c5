//! Memory-Mapped I/O Hardware Abstraction Layer.
//!
//! This module defines the boundary to the host's address-mapping
//! primitive and the window type through which device registers are
//! accessed once mapped.
//!
//! A window is handed out by [`AddressMapper::map`] and consumed again by
//! [`AddressMapper::unmap`], so no register access can be expressed on a
//! window after it has been released.

use core::ptr::{read_volatile, write_volatile};

/// Page size (4KB). One page covers the whole PL011 register block.
pub const PAGE_SIZE: usize = 4096;

/// The host could not establish the requested mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MapError;

/// A mapped range of 32-bit device registers.
///
/// Every call is a single, immediate access at the given byte offset.
/// Implementations must not cache, batch or reorder accesses.
pub trait RegisterWindow: Send {
    /// Length of the window in bytes.
    fn len(&self) -> usize;

    /// Read the 32-bit register at `offset`.
    fn read32(&self, offset: usize) -> u32;

    /// Write the 32-bit register at `offset`.
    fn write32(&mut self, offset: usize, value: u32);
}

/// Address-mapping primitive provided by the host.
pub trait AddressMapper {
    /// Window type returned by a successful mapping.
    type Window: RegisterWindow;

    /// Map `len` bytes of device memory starting at physical address `paddr`.
    ///
    /// # Errors
    /// Returns [`MapError`] if the window cannot be established, e.g. when
    /// the host is out of virtual address space. Nothing is left mapped on
    /// failure.
    fn map(&mut self, paddr: usize, len: usize) -> Result<Self::Window, MapError>;

    /// Release a window previously returned by [`map`](Self::map).
    fn unmap(&mut self, window: Self::Window);
}

/// Register window backed by a live virtual mapping of device memory.
pub struct MmioWindow {
    base: usize,
    len: usize,
}

impl MmioWindow {
    /// Wrap an existing device mapping.
    ///
    /// # Safety
    ///
    /// - `vaddr` must be the start of a mapping of at least `len` bytes
    /// - The mapping must be device memory (uncached) and 4-byte aligned
    /// - It must stay valid until the window is handed back to the mapper
    pub const unsafe fn new(vaddr: usize, len: usize) -> Self {
        Self { base: vaddr, len }
    }
}

impl RegisterWindow for MmioWindow {
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}

// SAFETY: MmioWindow only holds the address of device memory, which can be
// accessed from any context as long as accesses are serialized by the owner.
unsafe impl Send for MmioWindow {}
