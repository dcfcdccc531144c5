use super::Platform;

pub struct Bcm2837Platform;

impl Platform for Bcm2837Platform {
    const PERIPHERAL_BASE: usize = 0x3F00_0000;
    const UART0_BASE: usize = Self::PERIPHERAL_BASE + 0x20_1000;

    fn name() -> &'static str {
        "BCM2837 (Raspberry Pi 3)"
    }
}
