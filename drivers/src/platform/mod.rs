//! Platform Abstraction Layer
//!
//! Each supported SoC describes where its peripherals live. Exactly one
//! platform is compiled in, selected through Cargo features.
//!
//! # Usage
//!
//! ```rust
//! use drivers::platform::{CurrentPlatform, Platform};
//!
//! let uart_base = CurrentPlatform::UART0_BASE;
//! assert_eq!(uart_base & 0xFFF, 0);
//! ```

/// Platform trait - implemented by each supported platform
pub trait Platform {
    /// Start of the peripheral region (physical)
    const PERIPHERAL_BASE: usize;

    /// Physical address of the PL011 register block (UART0)
    const UART0_BASE: usize;

    /// Platform name for debugging
    fn name() -> &'static str;
}

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "bcm2837")] {
        mod bcm2837;
        pub use bcm2837::Bcm2837Platform as CurrentPlatform;
    } else if #[cfg(feature = "bcm2711")] {
        mod bcm2711;
        pub use bcm2711::Bcm2711Platform as CurrentPlatform;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features bcm2837\n\
            Or:  cargo build --no-default-features --features bcm2711"
        );
    }
}

// Ensure only one platform is selected
#[cfg(all(feature = "bcm2837", feature = "bcm2711"))]
compile_error!("Multiple platforms selected! Choose only one: bcm2837 OR bcm2711");
