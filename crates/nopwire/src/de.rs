//! The [`Deserializer`] façade: the read-side counterpart of
//! [`crate::Serializer`], wrapping a [`Reader`] by value.

use crate::core::io::Reader;
use crate::core::Status;
use crate::{read, Codec, Fungible};

/// Wraps a [`Reader`] by value. Reentrant and stateless beyond the reader
/// it owns.
#[derive(Debug)]
pub struct Deserializer<R> {
    reader: R,
}

impl<R> Deserializer<R> {
    /// Takes ownership of `reader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Borrows the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Mutably borrows the wrapped reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R: Reader> Deserializer<R> {
    /// Reads a value's tag and payload off the held reader.
    pub fn read<T: Codec>(&mut self) -> Status<T> {
        read(&mut self.reader)
    }

    /// Reads a `Declared` value from the held reader, where the bytes on
    /// the wire were written as `Supplied` — the Protocol gate's read
    /// side: `Declared: Fungible<Supplied>` is checked at compile time,
    /// rejecting an unrelated substitution before it ever reaches the
    /// codec.
    pub fn read_as<Declared, Supplied>(&mut self) -> Status<Declared>
    where
        Declared: Codec + Fungible<Supplied>,
    {
        read(&mut self.reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::{SliceReader, VecWriter};
    use crate::write;

    #[test]
    fn deserializer_reads_through_to_its_reader() {
        let mut w: VecWriter = VecWriter::new();
        write(&5u32, &mut w).unwrap();
        let mut de: Deserializer<SliceReader<'_>> = Deserializer::new(SliceReader::new(w.as_slice()));
        let value: u32 = de.read().unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn deserializer_is_reentrant_across_values() {
        let mut w: VecWriter = VecWriter::new();
        write(&1u32, &mut w).unwrap();
        write(&"hi".to_string(), &mut w).unwrap();
        let mut de: Deserializer<SliceReader<'_>> = Deserializer::new(SliceReader::new(w.as_slice()));
        let a: u32 = de.read().unwrap();
        let b: String = de.read().unwrap();
        assert_eq!((a, b.as_str()), (1, "hi"));
    }
}
