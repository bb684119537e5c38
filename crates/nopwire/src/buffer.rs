//! Logical buffers: a `(data, size)` pair, bounded or unbounded, used where
//! a structure wants a fixed-capacity scratch region without committing to
//! a full dynamic container.

use crate::core::io::{Reader, Writer};
use crate::core::{EncodingByte, Error, ErrorKind, SizeType, Status};
use crate::{read, size as wire_size, write, Codec};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A logical view over a length-prefixed sequence: either a fixed-capacity
/// [`BoundedBuf`] or a dynamically-sized [`UnboundedBuf`].
pub trait LogicalBuffer {
    /// Element type.
    type Item;

    /// The live elements, in order.
    fn as_slice(&self) -> &[Self::Item];
}

/// A buffer with a compile-time capacity `N`. Holds `0..=N` elements;
/// writes and reads exactly as many as are live, never padding to `N` —
/// the capacity only bounds, it is not itself part of the wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedBuf<T, const N: usize> {
    items: Vec<T>,
}

impl<T, const N: usize> BoundedBuf<T, N> {
    /// An empty buffer.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builds a buffer from `items`, rejecting more than `N` of them.
    pub fn from_vec(items: Vec<T>) -> Status<Self> {
        if items.len() > N {
            return Err(Error::new(ErrorKind::InvalidContainerLength));
        }
        Ok(Self { items })
    }

    /// Appends `item`, rejecting the push once at capacity.
    pub fn push(&mut self, item: T) -> Status<()> {
        if self.items.len() >= N {
            return Err(Error::new(ErrorKind::InvalidContainerLength));
        }
        self.items.push(item);
        Ok(())
    }

    /// The declared capacity `N`.
    pub const fn capacity() -> usize {
        N
    }
}

impl<T, const N: usize> Default for BoundedBuf<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> LogicalBuffer for BoundedBuf<T, N> {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Codec, const N: usize> Codec for BoundedBuf<T, N> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::ARRAY
    }

    fn encoded_size(&self) -> usize {
        wire_size(&(self.items.len() as SizeType))
            + self.items.iter().map(wire_size).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::ARRAY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write(&(self.items.len() as SizeType), w)?;
        for item in &self.items {
            write(item, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count: SizeType = read(r)?;
        let count = count as usize;
        if count > N {
            return Err(Error::new(ErrorKind::InvalidContainerLength));
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(read(r)?);
        }
        Ok(Self { items })
    }
}

/// A buffer with no compile-time capacity, wire-identical to [`Vec<T>`] —
/// offered as a distinct logical type so a structure can express "an
/// unbounded buffer" as a concept separate from a general growable
/// container, matching the `BoundedBuf`/`UnboundedBuf` pairing used
/// elsewhere in the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundedBuf<T> {
    items: Vec<T>,
}

impl<T> UnboundedBuf<T> {
    /// An empty buffer.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builds a buffer from `items`.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Appends `item`.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }
}

impl<T> Default for UnboundedBuf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LogicalBuffer for UnboundedBuf<T> {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Codec> Codec for UnboundedBuf<T> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::ARRAY
    }

    fn encoded_size(&self) -> usize {
        wire_size(&(self.items.len() as SizeType))
            + self.items.iter().map(wire_size).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::ARRAY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write(&(self.items.len() as SizeType), w)?;
        for item in &self.items {
            write(item, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count: SizeType = read(r)?;
        let mut items = Vec::with_capacity((count as usize).min(1024));
        for _ in 0..count as usize {
            items.push(read(r)?);
        }
        Ok(Self { items })
    }
}
