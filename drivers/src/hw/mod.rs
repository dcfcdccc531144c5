//! Register-level definitions of the hardware blocks the drivers touch.

pub mod pl011;
