//! PL011 register block.
//!
//! Offsets and flag bits follow the ARM PrimeCell UART (PL011) TRM. Only
//! the data and flag registers are touched by the driver; the remaining
//! registers keep their firmware configuration.

use crate::hal::mmio::RegisterWindow;
use bitflags::bitflags;

/// PL011 registers, named by their TRM mnemonic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    /// Data Register (UARTDR)
    Dr,
    /// Flag Register (UARTFR)
    Fr,
    /// Integer Baud Rate Divisor (UARTIBRD)
    Ibrd,
    /// Fractional Baud Rate Divisor (UARTFBRD)
    Fbrd,
    /// Line Control Register (UARTLCR_H)
    Lcrh,
    /// Control Register (UARTCR)
    Cr,
    /// Interrupt Mask Set/Clear (UARTIMSC)
    Imsc,
}

impl Register {
    /// Byte offset from the start of the register block.
    pub const fn offset(self) -> usize {
        match self {
            Register::Dr => 0x00,
            Register::Fr => 0x18,
            Register::Ibrd => 0x24,
            Register::Fbrd => 0x28,
            Register::Lcrh => 0x2C,
            Register::Cr => 0x30,
            Register::Imsc => 0x38,
        }
    }
}

/// Bytes a window must span to cover every named register.
pub const REGISTER_BLOCK_SIZE: usize = Register::Imsc.offset() + 4;

bitflags! {
    /// Flag Register (FR) bits
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Flags: u32 {
        /// UART busy transmitting
        const BUSY = 1 << 3;
        /// Receive FIFO empty
        const RXFE = 1 << 4;
        /// Transmit FIFO full
        const TXFF = 1 << 5;
    }
}

/// Typed register view over a mapped PL011 window.
pub struct Registers<W: RegisterWindow> {
    window: W,
}

impl<W: RegisterWindow> Registers<W> {
    /// Wrap a mapped window.
    ///
    /// Hands the window back if it is too short to hold the register block.
    pub fn new(window: W) -> Result<Self, W> {
        if window.len() < REGISTER_BLOCK_SIZE {
            return Err(window);
        }
        Ok(Self { window })
    }

    #[inline]
    pub fn read(&self, reg: Register) -> u32 {
        self.window.read32(reg.offset())
    }

    #[inline]
    pub fn write(&mut self, reg: Register, value: u32) {
        self.window.write32(reg.offset(), value)
    }

    /// Current flag register contents.
    pub fn flags(&self) -> Flags {
        Flags::from_bits_retain(self.read(Register::Fr))
    }

    /// Give the window back for unmapping.
    pub fn into_window(self) -> W {
        self.window
    }
}
