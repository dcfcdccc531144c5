use super::Platform;

pub struct Bcm2711Platform;

impl Platform for Bcm2711Platform {
    // Low-peripheral mode, as the firmware boots by default
    const PERIPHERAL_BASE: usize = 0xFE00_0000;
    const UART0_BASE: usize = Self::PERIPHERAL_BASE + 0x20_1000;

    fn name() -> &'static str {
        "BCM2711 (Raspberry Pi 4)"
    }
}
