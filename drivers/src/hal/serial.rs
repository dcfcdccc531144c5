//! Serial Port (UART) Hardware Abstraction Layer.
//!
//! This module defines the platform-independent byte-level interface a
//! UART controller offers once its registers are reachable. Line settings
//! (baud rate, framing) are inherited from firmware and are not part of
//! the interface.

/// Blocking serial port.
///
/// Both directions wait for the hardware handshake without a bound, so a
/// stalled line blocks the caller indefinitely.
pub trait SerialPort {
    /// Write a single byte, waiting until the transmitter can accept it.
    fn write_byte(&mut self, byte: u8);

    /// Write multiple bytes in order, each fully handshaked before the next.
    fn write(&mut self, bytes: &[u8]) -> usize {
        for &byte in bytes {
            self.write_byte(byte);
        }
        bytes.len()
    }

    /// Read a single byte, waiting until the receiver holds one.
    fn read_byte(&mut self) -> u8;
}
