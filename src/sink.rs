//! Positioned byte sinks the movie writer streams into.

use alloc::vec::Vec;

use crate::{Result, error::Error};

/// A seekable byte destination.
pub trait FrameSink {
    /// Write all of `bytes` at the current position and advance past them.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying destination.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Move to an absolute byte offset.
    ///
    /// Seeking past the end is allowed; the gap reads as zeros once something is written
    /// after it.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying destination.
    fn seek_to(&mut self, offset: u64) -> Result<()>;

    /// # Errors
    ///
    /// Any failure of the underlying destination.
    fn flush(&mut self) -> Result<()>;
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        T::write_all(self, bytes)
    }

    fn seek_to(&mut self, offset: u64) -> Result<()> {
        T::seek_to(self, offset)
    }

    fn flush(&mut self) -> Result<()> {
        T::flush(self)
    }
}

/// An in-memory sink, usable without `std`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySink {
    bytes: Vec<u8>,
    position: usize,
}

impl MemorySink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            position: 0,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl FrameSink for MemorySink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self
            .position
            .checked_add(bytes.len())
            .ok_or(Error::Allocation { bytes: usize::MAX })?;
        if let Some(additional) = end.checked_sub(self.bytes.len()) {
            self.bytes
                .try_reserve(additional)
                .map_err(|_| Error::Allocation { bytes: end })?;
            self.bytes.resize(end, 0);
        }
        if let Some(target) = self.bytes.get_mut(self.position..end) {
            target.copy_from_slice(bytes);
        }
        self.position = end;
        Ok(())
    }

    fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.position = usize::try_from(offset).map_err(|_| Error::SeekOverflow { offset })?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Adapts any `std::io::Write + Seek`, such as a [`std::fs::File`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSink<W>(W);

#[cfg(feature = "std")]
impl<W: std::io::Write + std::io::Seek> IoSink<W> {
    #[must_use]
    pub const fn new(inner: W) -> Self {
        Self(inner)
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.0
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write + std::io::Seek> FrameSink for IoSink<W> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.0.write_all(bytes)?;
        Ok(())
    }

    fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.0.seek(std::io::SeekFrom::Start(offset))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.0.flush()?;
        Ok(())
    }
}
