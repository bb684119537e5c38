use crate::error::{Error, ErrorKind, Status};
use crate::handle::HandleReference;
use crate::io::NoHandle;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// The byte-stream input contract the codec depends on. `Ensure` lets a
/// container codec check a length-prefixed claim against the bytes
/// actually available *before* allocating, so a maliciously inflated
/// length cannot drive unbounded allocation.
pub trait Reader {
    /// The out-of-band resource type this reader can resolve handles into.
    /// Use [`NoHandle`] for streams that carry none.
    type Handle;

    /// Promises that at least `n` more bytes are available, without
    /// consuming them. Implementations that can't know in advance (e.g. an
    /// unbuffered stream) may always succeed and let the eventual read fail.
    fn ensure(&mut self, n: usize) -> Status<()>;

    /// Reads a single byte.
    fn read_u8(&mut self) -> Status<u8>;

    /// Reads exactly `buf.len()` bytes.
    fn read_exact(&mut self, buf: &mut [u8]) -> Status<()>;

    /// Bytes known to remain, or `usize::MAX` if unknown (unbuffered streams).
    fn remaining(&self) -> usize;

    /// Discards `n` bytes (used to skip unknown table entries and padding).
    fn skip(&mut self, n: usize) -> Status<()> {
        let mut left = n;
        let mut scratch = [0u8; 64];
        while left > 0 {
            let chunk = left.min(scratch.len());
            self.read_exact(&mut scratch[..chunk])?;
            left -= chunk;
        }
        Ok(())
    }

    /// Resolves a non-negative handle reference into a live handle. Callers
    /// never pass [`crate::handle::EMPTY_HANDLE_REFERENCE`] here — the
    /// handle codec special-cases the empty reference itself.
    fn get_handle(&mut self, reference: HandleReference) -> Status<Self::Handle>;
}

/// Bounds-checked reader over a borrowed byte slice. The default in-memory
/// `Reader`, analogous to the original implementation's `TestReader`.
#[derive(Debug)]
pub struct SliceReader<'a, H = NoHandle> {
    data: &'a [u8],
    offset: usize,
    handles: Vec<Option<H>>,
}

impl<'a, H> SliceReader<'a, H> {
    /// Wraps `data` with no handle table; `get_handle` always fails.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0, handles: Vec::new() }
    }

    /// Wraps `data` with a pre-populated out-of-band handle table, in the
    /// order the matching Writer pushed them.
    pub fn with_handles(data: &'a [u8], handles: Vec<H>) -> Self {
        Self { data, offset: 0, handles: handles.into_iter().map(Some).collect() }
    }

    /// Current read offset into `data`.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a, H> Reader for SliceReader<'a, H> {
    type Handle = H;

    fn ensure(&mut self, n: usize) -> Status<()> {
        if self.remaining() < n {
            Err(Error::new(ErrorKind::ReadLimitReached))
        } else {
            Ok(())
        }
    }

    fn read_u8(&mut self) -> Status<u8> {
        self.ensure(1)?;
        let b = self.data[self.offset];
        self.offset += 1;
        Ok(b)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Status<()> {
        self.ensure(buf.len())?;
        buf.copy_from_slice(&self.data[self.offset..self.offset + buf.len()]);
        self.offset += buf.len();
        Ok(())
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn get_handle(&mut self, reference: HandleReference) -> Status<H> {
        if reference < 0 {
            return Err(Error::new(ErrorKind::InvalidHandleReference));
        }
        let idx = reference as usize;
        match self.handles.get_mut(idx).and_then(Option::take) {
            Some(h) => Ok(h),
            None => Err(Error::new(ErrorKind::InvalidHandleReference)),
        }
    }
}

/// A reader that fails every operation with a fixed [`ErrorKind`]. Used to
/// exercise the codec's error-propagation paths without constructing a
/// real truncated buffer for each failure mode.
#[derive(Debug, Clone, Copy)]
pub struct FailingReader {
    error: ErrorKind,
}

impl FailingReader {
    /// Builds a reader that fails every call with `error`.
    pub const fn new(error: ErrorKind) -> Self {
        Self { error }
    }
}

impl Reader for FailingReader {
    type Handle = NoHandle;

    fn ensure(&mut self, _n: usize) -> Status<()> {
        Err(Error::new(self.error))
    }

    fn read_u8(&mut self) -> Status<u8> {
        Err(Error::new(self.error))
    }

    fn read_exact(&mut self, _buf: &mut [u8]) -> Status<()> {
        Err(Error::new(self.error))
    }

    fn remaining(&self) -> usize {
        0
    }

    fn get_handle(&mut self, _reference: HandleReference) -> Status<NoHandle> {
        Err(Error::new(self.error))
    }
}

/// Adapts any [`std::io::Read`] into a [`Reader`]. Carries no handle
/// support — a raw byte stream has no out-of-band side channel.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoReader<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwraps the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
fn map_io_error(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::new(ErrorKind::ReadLimitReached)
    } else {
        Error::from(e)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Reader for IoReader<R> {
    type Handle = NoHandle;

    fn ensure(&mut self, _n: usize) -> Status<()> {
        // A stream can't be peeked without buffering; the eventual read
        // reports `ReadLimitReached` if the promise doesn't hold.
        Ok(())
    }

    fn read_u8(&mut self) -> Status<u8> {
        let mut b = [0u8; 1];
        self.inner.read_exact(&mut b).map_err(map_io_error)?;
        Ok(b[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Status<()> {
        self.inner.read_exact(buf).map_err(map_io_error)
    }

    fn remaining(&self) -> usize {
        usize::MAX
    }

    fn get_handle(&mut self, _reference: HandleReference) -> Status<NoHandle> {
        Err(Error::new(ErrorKind::InvalidHandleReference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_reader_reads_in_order() {
        let mut r: SliceReader<'_> = SliceReader::new(&[1, 2, 3, 4]);
        assert_eq!(r.read_u8().unwrap(), 1);
        let mut buf = [0u8; 2];
        r.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [2, 3]);
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn slice_reader_reports_read_limit() {
        let mut r: SliceReader<'_> = SliceReader::new(&[1]);
        let mut buf = [0u8; 2];
        assert_eq!(r.read_exact(&mut buf).unwrap_err().kind(), ErrorKind::ReadLimitReached);
    }

    #[test]
    fn slice_reader_resolves_handles_once() {
        let mut r: SliceReader<'_, u32> = SliceReader::with_handles(&[], vec![42, 7]);
        assert_eq!(r.get_handle(1).unwrap(), 7);
        assert_eq!(r.get_handle(1).unwrap_err().kind(), ErrorKind::InvalidHandleReference);
        assert_eq!(r.get_handle(0).unwrap(), 42);
    }
}
