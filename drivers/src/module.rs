//! UART driver lifecycle.
//!
//! Loading maps the PL011 register block and then publishes the device
//! file; unloading removes the file and then unmaps. A failure while
//! loading undoes only the steps already taken, so the endpoint is never
//! reachable without a mapped controller behind it.

use crate::error::{DriverError, Result};
use crate::hal::endpoint::{EndpointRegistry, FileOperations, Mode};
use crate::hal::mmio::{AddressMapper, PAGE_SIZE, RegisterWindow};
use crate::hw::pl011::Registers;
use crate::peripheral::pl011::Pl011;
use crate::platform::{CurrentPlatform, Platform};
use crate::uart::UartFile;
use alloc::sync::Arc;
use log::{debug, error, info};

/// Name the device file is published under.
pub const ENDPOINT_NAME: &str = "lll-uart";

/// Permissions of the published device file.
pub const ENDPOINT_MODE: Mode = Mode::READ_WRITE_ALL;

struct Loaded<W: RegisterWindow, E> {
    file: Arc<UartFile<W>>,
    endpoint: E,
}

/// The UART driver as seen by its host: owns the injected primitives and
/// the resources acquired through them.
pub struct UartModule<M: AddressMapper, R: EndpointRegistry> {
    mapper: M,
    registry: R,
    base: usize,
    loaded: Option<Loaded<M::Window, R::Endpoint>>,
}

impl<M, R> UartModule<M, R>
where
    M: AddressMapper,
    M::Window: 'static,
    R: EndpointRegistry,
{
    /// Driver for UART0 of the platform selected at build time.
    pub fn new(mapper: M, registry: R) -> Self {
        Self::with_base(mapper, registry, CurrentPlatform::UART0_BASE)
    }

    /// Driver for a PL011 at an explicit physical address.
    pub fn with_base(mapper: M, registry: R, base: usize) -> Self {
        Self {
            mapper,
            registry,
            base,
            loaded: None,
        }
    }

    /// Map the controller and publish the device file.
    ///
    /// Calling this on a loaded module is a no-op.
    ///
    /// # Errors
    /// - [`DriverError::MapFailed`] if the window cannot be mapped (nothing
    ///   is left behind)
    /// - [`DriverError::PublishFailed`] if the file cannot be published (the
    ///   window is unmapped again before returning)
    pub fn load(&mut self) -> Result<()> {
        if self.loaded.is_some() {
            debug!("UART Driver: already loaded");
            return Ok(());
        }

        info!("UART Driver: Initializing on {}...", CurrentPlatform::name());

        let window = self.mapper.map(self.base, PAGE_SIZE).map_err(|err| {
            error!("UART Driver: Failed to map UART memory");
            DriverError::from(err)
        })?;

        let regs = match Registers::new(window) {
            Ok(regs) => regs,
            Err(window) => {
                self.mapper.unmap(window);
                error!("UART Driver: Mapped window too small for PL011 registers");
                return Err(DriverError::MapFailed);
            }
        };
        info!("UART Driver: Successfully mapped UART memory at {:#x}", self.base);

        let file = Arc::new(UartFile::new(Pl011::new(regs)));
        let ops: Arc<dyn FileOperations> = file.clone();

        let endpoint = match self.registry.publish(ENDPOINT_NAME, ENDPOINT_MODE, ops) {
            Ok(endpoint) => endpoint,
            Err(err) => {
                if let Some(port) = file.detach() {
                    self.mapper.unmap(port.into_window());
                }
                error!("UART Driver: Failed to create {} endpoint", ENDPOINT_NAME);
                return Err(err.into());
            }
        };
        info!("UART Driver: {} created successfully", ENDPOINT_NAME);

        self.loaded = Some(Loaded { file, endpoint });
        Ok(())
    }

    /// Remove the device file and unmap the controller.
    ///
    /// Requests already running finish before the window is released;
    /// calling this on an unloaded module does nothing.
    pub fn unload(&mut self) {
        let Some(Loaded { file, endpoint }) = self.loaded.take() else {
            return;
        };

        info!("UART Driver: Exiting...");

        self.registry.unpublish(endpoint);
        if let Some(port) = file.detach() {
            self.mapper.unmap(port.into_window());
        }

        info!("UART Driver: Successfully removed");
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Physical address of the register block this module drives.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Published name, while loaded.
    pub fn endpoint_name(&self) -> Option<&'static str> {
        self.loaded.as_ref().map(|_| ENDPOINT_NAME)
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn mapper_mut(&mut self) -> &mut M {
        &mut self.mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::user::{UserSink, UserSource};
    use crate::hw::pl011::{Flags, Register};
    use crate::mock::{Event, EventLog, MockMapper, MockRegistry, MockWindow};
    use std::thread;
    use std::time::Duration;

    const BASE: usize = 0x3F20_1000;

    fn module(events: &EventLog) -> UartModule<MockMapper, MockRegistry> {
        UartModule::with_base(MockMapper::new(events), MockRegistry::new(events), BASE)
    }

    fn write(ops: &dyn FileOperations, data: &[u8]) -> Result<usize> {
        let src: &dyn UserSource = &data;
        ops.write(src, data.len())
    }

    fn read(ops: &dyn FileOperations) -> Result<u8> {
        let mut storage = [0u8; 1];
        let mut dst: &mut [u8] = &mut storage;
        let sink: &mut dyn UserSink = &mut dst;
        ops.read(sink, 1)?;
        Ok(storage[0])
    }

    #[test]
    fn test_load_maps_then_publishes() {
        let events = EventLog::new();
        let mut module = module(&events);

        module.load().unwrap();

        assert!(module.is_loaded());
        assert_eq!(module.endpoint_name(), Some("lll-uart"));
        assert_eq!(
            events.events(),
            [
                Event::Mapped {
                    paddr: BASE,
                    len: PAGE_SIZE
                },
                Event::Published {
                    name: "lll-uart",
                    mode: Mode::READ_WRITE_ALL
                },
            ]
        );
        assert_eq!(module.registry().mode("lll-uart").unwrap().bits(), 0o666);
    }

    #[test]
    fn test_load_defaults_to_platform_uart() {
        let events = EventLog::new();
        let module = UartModule::new(MockMapper::new(&events), MockRegistry::new(&events));
        assert_eq!(module.base(), CurrentPlatform::UART0_BASE);
    }

    #[test]
    fn test_map_failure_leaves_nothing() {
        let events = EventLog::new();
        let mut module = module(&events);
        module.mapper_mut().set_fail(true);

        assert_eq!(module.load(), Err(DriverError::MapFailed));
        assert!(!module.is_loaded());
        assert!(events.events().is_empty());
        assert!(!module.registry().is_published(ENDPOINT_NAME));
    }

    #[test]
    fn test_publish_failure_unmaps() {
        let events = EventLog::new();
        let mut module = module(&events);
        module.registry_mut().set_fail(true);

        assert_eq!(module.load(), Err(DriverError::PublishFailed));
        assert!(!module.is_loaded());
        assert_eq!(module.mapper().live_mappings(), 0);
        assert!(module.mapper().window().is_unmapped());
        assert_eq!(
            events.events(),
            [
                Event::Mapped {
                    paddr: BASE,
                    len: PAGE_SIZE
                },
                Event::Unmapped,
            ]
        );
    }

    #[test]
    fn test_short_window_is_map_failure() {
        let events = EventLog::new();
        let mapper = MockMapper::with_window(&events, MockWindow::with_len(0x20));
        let mut module = UartModule::with_base(mapper, MockRegistry::new(&events), BASE);

        assert_eq!(module.load(), Err(DriverError::MapFailed));
        assert_eq!(module.mapper().live_mappings(), 0);
        assert!(!module.registry().is_published(ENDPOINT_NAME));
    }

    #[test]
    fn test_retry_after_failed_load() {
        let events = EventLog::new();
        let mut module = module(&events);
        module.registry_mut().set_fail(true);
        assert!(module.load().is_err());

        module.registry_mut().set_fail(false);
        module.load().unwrap();
        assert!(module.registry().is_published(ENDPOINT_NAME));
        assert_eq!(module.mapper().live_mappings(), 1);
    }

    #[test]
    fn test_unload_unpublishes_before_unmapping() {
        let events = EventLog::new();
        let mut module = module(&events);
        module.load().unwrap();

        module.unload();

        assert!(!module.is_loaded());
        assert_eq!(module.endpoint_name(), None);
        assert_eq!(module.mapper().live_mappings(), 0);
        assert_eq!(
            &events.events()[2..],
            [Event::Unpublished { name: "lll-uart" }, Event::Unmapped]
        );
    }

    #[test]
    fn test_load_and_unload_are_idempotent() {
        let events = EventLog::new();
        let mut module = module(&events);

        module.unload();
        assert!(events.events().is_empty());

        module.load().unwrap();
        module.load().unwrap();
        assert_eq!(module.mapper().live_mappings(), 1);
        assert_eq!(events.events().len(), 2);

        module.unload();
        module.unload();
        assert_eq!(events.events().len(), 4);
    }

    #[test]
    fn test_published_file_drives_uart() {
        let events = EventLog::new();
        let mut module = module(&events);
        module.load().unwrap();

        let window = module.mapper().window();
        window.push_rx(b'!' as u32);
        let ops = module.registry().open(ENDPOINT_NAME).unwrap();

        assert_eq!(write(&*ops, b"hello").unwrap(), 5);
        assert_eq!(window.transmitted(), b"hello");
        assert_eq!(read(&*ops).unwrap(), b'!');
    }

    #[test]
    fn test_stale_handle_after_unload() {
        let events = EventLog::new();
        let mut module = module(&events);
        module.load().unwrap();
        let ops = module.registry().open(ENDPOINT_NAME).unwrap();
        let window = module.mapper().window();

        module.unload();
        window.clear_accesses();

        assert_eq!(write(&*ops, b"late"), Err(DriverError::NoDevice));
        assert_eq!(read(&*ops), Err(DriverError::NoDevice));
        assert!(window.accesses().is_empty());
    }

    #[test]
    fn test_unload_waits_for_running_write() {
        let events = EventLog::new();
        let mut module = module(&events);
        module.load().unwrap();
        let ops = module.registry().open(ENDPOINT_NAME).unwrap();
        let window = module.mapper().window();

        // Transmit FIFO stays full until released below
        window.set_idle_flags(Flags::TXFF.bits());
        let writer = thread::spawn(move || write(&*ops, b"abc"));
        while window.reads_of(Register::Fr) == 0 {
            thread::yield_now();
        }

        let unloader = thread::spawn(move || {
            module.unload();
            module
        });
        let unpublished = Event::Unpublished {
            name: ENDPOINT_NAME,
        };
        while !events.events().contains(&unpublished) {
            thread::yield_now();
        }
        thread::sleep(Duration::from_millis(10));

        assert!(!window.is_unmapped());
        assert!(!unloader.is_finished());

        window.set_idle_flags(0);
        assert_eq!(writer.join().unwrap(), Ok(3));
        let module = unloader.join().unwrap();

        assert!(window.is_unmapped());
        assert_eq!(module.mapper().live_mappings(), 0);
        assert_eq!(window.transmitted(), b"abc");
        assert_eq!(events.events().last(), Some(&Event::Unmapped));
    }
}
