use crate::error::{Error, ErrorKind, Status};
use crate::handle::HandleReference;
use crate::io::Reader;

/// Restricts a `Reader` to exactly `len` bytes, used by the table codec to
/// read an entry's payload without letting it read past its declared
/// `payload_size`, and to drain unread trailing bytes once the entry is
/// skipped or fully consumed.
///
/// `len` is capped against the underlying reader's remaining bytes at
/// construction time, so a maliciously inflated `payload_size` cannot
/// drive an oversized allocation downstream (see `spec.md` §9, Open
/// Questions).
pub struct BoundedReader<'a, R: Reader + ?Sized> {
    inner: &'a mut R,
    remaining: usize,
}

impl<'a, R: Reader + ?Sized> BoundedReader<'a, R> {
    /// Opens a bounded region of `len` bytes over `inner`.
    pub fn new(inner: &'a mut R, len: usize) -> Status<Self> {
        let available = inner.remaining();
        if available != usize::MAX && len > available {
            return Err(Error::new(ErrorKind::ReadLimitReached));
        }
        Ok(Self { inner, remaining: len })
    }

    /// Drains any bytes left in the region (the encoder over-reserved, or
    /// the entry was skipped outright).
    pub fn finish(mut self) -> Status<()> {
        if self.remaining > 0 {
            self.inner.skip(self.remaining)?;
            self.remaining = 0;
        }
        Ok(())
    }
}

impl<'a, R: Reader + ?Sized> Reader for BoundedReader<'a, R> {
    type Handle = R::Handle;

    fn ensure(&mut self, n: usize) -> Status<()> {
        if n > self.remaining {
            return Err(Error::new(ErrorKind::ReadLimitReached));
        }
        self.inner.ensure(n)
    }

    fn read_u8(&mut self) -> Status<u8> {
        self.ensure(1)?;
        let b = self.inner.read_u8()?;
        self.remaining -= 1;
        Ok(b)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Status<()> {
        self.ensure(buf.len())?;
        self.inner.read_exact(buf)?;
        self.remaining -= buf.len();
        Ok(())
    }

    fn remaining(&self) -> usize {
        self.remaining
    }

    fn get_handle(&mut self, reference: HandleReference) -> Status<Self::Handle> {
        self.inner.get_handle(reference)
    }
}
