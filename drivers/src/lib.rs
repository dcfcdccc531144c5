//! PL011 UART Driver
//!
//! A polled, character-oriented UART driver for the Raspberry Pi that is
//! reachable through a single published byte-stream node.
//!
//! # Module Organization
//!
//! - [`hal`]: Traits for the host primitives (mapping, publication,
//!   caller copies) and the serial port interface
//! - [`hw`]: PL011 register offsets and flag bits
//! - [`peripheral`]: Blocking PL011 transmit/receive
//! - [`platform`]: Build-time SoC selection (`bcm2837` or `bcm2711`)
//! - [`uart`]: Device file bridging caller buffers to the UART
//! - [`module`]: Load/unload sequencing with rollback
//!
//! # Usage Example
//!
//! ```ignore
//! use drivers::module::UartModule;
//!
//! // `mapper` and `registry` are the host's implementations of
//! // `AddressMapper` and `EndpointRegistry`.
//! let mut uart = UartModule::new(mapper, registry);
//! uart.load()?;
//! // ... callers read and write "lll-uart" ...
//! uart.unload();
//! ```

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

pub mod error;
pub mod hal;
pub mod hw;
pub mod module;
pub mod peripheral;
pub mod platform;
pub mod uart;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{DriverError, Result};
pub use hal::serial::SerialPort;
pub use module::{ENDPOINT_MODE, ENDPOINT_NAME, UartModule};
pub use uart::{UART_MAX_USER_SIZE, UartFile};
