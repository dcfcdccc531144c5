//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines the traits the UART driver is written against.
//! The host runtime implements the boundary primitives; the driver
//! implements the serial port.
//!
//! # Available Interfaces
//!
//! - [`mmio`]: Address mapping and register windows
//! - [`serial`]: Serial port (UART) communication
//! - [`endpoint`]: Publication of byte-stream nodes
//! - [`user`]: Copies across the caller/driver boundary

pub mod endpoint;
pub mod mmio;
pub mod serial;
pub mod user;
