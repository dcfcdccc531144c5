//! Trusted-boundary copy primitives.
//!
//! Buffers handed to the driver by a caller are never touched directly;
//! the driver stages data through these traits so the host can police
//! the caller's address range.

/// The caller's buffer could not be accessed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CopyError;

/// Caller-owned memory the driver reads from (write requests).
pub trait UserSource {
    /// Copy `dst.len()` bytes from the start of the caller's buffer.
    ///
    /// On error `dst` may hold partially copied data.
    fn copy_in(&self, dst: &mut [u8]) -> Result<(), CopyError>;
}

/// Caller-owned memory the driver writes to (read requests).
pub trait UserSink {
    /// Copy all of `src` to the start of the caller's buffer.
    fn copy_out(&mut self, src: &[u8]) -> Result<(), CopyError>;
}

impl UserSource for &[u8] {
    fn copy_in(&self, dst: &mut [u8]) -> Result<(), CopyError> {
        let src = self.get(..dst.len()).ok_or(CopyError)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl UserSink for &mut [u8] {
    fn copy_out(&mut self, src: &[u8]) -> Result<(), CopyError> {
        let dst = self.get_mut(..src.len()).ok_or(CopyError)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_copy_in_bounds() {
        let src: &[u8] = b"hello";
        let mut dst = [0u8; 3];
        src.copy_in(&mut dst).unwrap();
        assert_eq!(&dst, b"hel");

        let mut too_long = [0u8; 6];
        assert_eq!(src.copy_in(&mut too_long), Err(CopyError));
    }

    #[test]
    fn test_slice_copy_out_bounds() {
        let mut storage = [0u8; 2];
        let mut sink: &mut [u8] = &mut storage;
        sink.copy_out(b"a").unwrap();
        assert_eq!(sink.copy_out(b"abc"), Err(CopyError));
        assert_eq!(storage[0], b'a');
    }
}
