//! Peripheral Drivers
//!
//! Drivers for controller blocks that appear on more than one SoC.
//!
//! - [`pl011`]: ARM PrimeCell PL011 UART
pub mod pl011;
