use crate::error::{DriverError, Result};
use crate::hal::endpoint::FileOperations;
use crate::hal::mmio::RegisterWindow;
use crate::hal::serial::SerialPort;
use crate::hal::user::{CopyError, UserSink, UserSource};
use crate::peripheral::pl011::Pl011;
use log::{debug, trace};
use spin::Mutex;

/// Largest write accepted in one request; longer writes are truncated.
pub const UART_MAX_USER_SIZE: usize = 256;

/// Staging area for write requests.
pub struct TransferBuffer {
    data: [u8; UART_MAX_USER_SIZE],
}

impl TransferBuffer {
    pub const fn new() -> Self {
        Self {
            data: [0; UART_MAX_USER_SIZE],
        }
    }

    /// Clear the buffer and copy up to `size` bytes from the caller.
    ///
    /// Returns the staged bytes. On a fault the buffer is left zeroed.
    pub fn stage(
        &mut self,
        src: &dyn UserSource,
        size: usize,
    ) -> core::result::Result<&[u8], CopyError> {
        self.data.fill(0);

        let len = size.min(UART_MAX_USER_SIZE);
        if len > 0 {
            if let Err(err) = src.copy_in(&mut self.data[..len]) {
                self.data.fill(0);
                return Err(err);
            }
        }
        Ok(&self.data[..len])
    }
}

impl Default for TransferBuffer {
    fn default() -> Self {
        Self::new()
    }
}

struct Device<W: RegisterWindow> {
    port: Pl011<W>,
    buffer: TransferBuffer,
}

/// UART device file - byte-stream interface published for callers.
///
/// Each request holds the device lock for its full duration, so concurrent
/// callers are serialized rather than sharing the transfer buffer. This
/// covers the hardware wait too: a reader blocked on an empty receive FIFO
/// stalls every writer, and teardown, until a byte arrives.
pub struct UartFile<W: RegisterWindow> {
    device: Mutex<Option<Device<W>>>,
}

impl<W: RegisterWindow> UartFile<W> {
    pub fn new(port: Pl011<W>) -> Self {
        Self {
            device: Mutex::new(Some(Device {
                port,
                buffer: TransferBuffer::new(),
            })),
        }
    }

    /// Take the port out once in-flight requests are done.
    ///
    /// Later requests fail with [`DriverError::NoDevice`].
    pub fn detach(&self) -> Option<Pl011<W>> {
        self.device.lock().take().map(|device| device.port)
    }
}

impl<W: RegisterWindow> FileOperations for UartFile<W> {
    /// Receive one byte, whatever `size` the caller asked for.
    ///
    /// The byte is consumed from the hardware before it is copied out; if
    /// that copy faults the byte is lost.
    fn read(&self, buf: &mut dyn UserSink, _size: usize) -> Result<usize> {
        let byte = {
            let mut guard = self.device.lock();
            let device = guard.as_mut().ok_or(DriverError::NoDevice)?;
            device.port.read_byte()
        };
        trace!("UART Read: {:#04x}", byte);

        buf.copy_out(&[byte])?;
        Ok(1)
    }

    fn write(&self, buf: &dyn UserSource, size: usize) -> Result<usize> {
        let mut guard = self.device.lock();
        let Device { port, buffer } = guard.as_mut().ok_or(DriverError::NoDevice)?;

        let staged = buffer.stage(buf, size)?;
        match core::str::from_utf8(staged) {
            Ok(text) => debug!("UART Write: {}", text),
            Err(_) => debug!("UART Write: {:02x?}", staged),
        }

        Ok(port.write(staged))
    }
}
