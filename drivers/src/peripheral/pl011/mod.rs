//! ARM PrimeCell PL011 UART Driver
//!
//! Polled, blocking character I/O over the data and flag registers.
//! Line configuration (baud rate, 8N1, FIFOs) is inherited from the
//! firmware and never touched here.
//!
//! # Example
//!
//! ```no_run
//! use drivers::hal::mmio::{MmioWindow, PAGE_SIZE};
//! use drivers::hal::serial::SerialPort;
//! use drivers::hw::pl011::Registers;
//! use drivers::peripheral::pl011::Pl011;
//!
//! let window = unsafe { MmioWindow::new(0x3F20_1000, PAGE_SIZE) };
//! if let Ok(regs) = Registers::new(window) {
//!     let mut uart = Pl011::new(regs);
//!     uart.write(b"Hello, world!\n");
//! }
//! ```

use crate::hal::mmio::RegisterWindow;
use crate::hal::serial::SerialPort;
use crate::hw::pl011::{Flags, Register, Registers};

/// PL011 UART driver.
pub struct Pl011<W: RegisterWindow> {
    regs: Registers<W>,
}

impl<W: RegisterWindow> Pl011<W> {
    pub fn new(regs: Registers<W>) -> Self {
        Self { regs }
    }

    /// Spin until the flag register no longer reports `flag`.
    ///
    /// There is no timeout: a line that never becomes ready blocks forever.
    fn wait_while(&self, flag: Flags) {
        while self.regs.flags().contains(flag) {
            core::hint::spin_loop();
        }
    }

    /// Release the register window.
    pub fn into_window(self) -> W {
        self.regs.into_window()
    }
}

impl<W: RegisterWindow> SerialPort for Pl011<W> {
    fn write_byte(&mut self, byte: u8) {
        // Wait for TX FIFO to have space
        self.wait_while(Flags::TXFF);
        self.regs.write(Register::Dr, byte as u32);
    }

    fn read_byte(&mut self) -> u8 {
        // Wait for data to be available
        self.wait_while(Flags::RXFE);
        // Bits 8-11 carry framing/parity/break/overrun status
        (self.regs.read(Register::Dr) & 0xFF) as u8
    }
}
