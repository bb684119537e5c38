//! Codecs pour les conteneurs : séquences (`Array`), octets bruts
//! (`Binary`), texte (`String`), tables associatives (`Map`) et tuples (vus
//! comme des `Array` de taille fixe).

use crate::core::io::{Reader, Writer};
use crate::core::{EncodingByte, Error, ErrorKind, SizeType, Status};
use crate::{read, size, write, Codec};

#[cfg(feature = "std")]
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

fn write_count<W: Writer + ?Sized>(count: usize, w: &mut W) -> Status<()> {
    write(&(count as SizeType), w)
}

fn read_count<R: Reader + ?Sized>(r: &mut R) -> Status<usize> {
    let n: SizeType = read(r)?;
    Ok(n as usize)
}

impl<T: Codec> Codec for Vec<T> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::ARRAY
    }

    fn encoded_size(&self) -> usize {
        size(&(self.len() as SizeType)) + self.iter().map(size).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::ARRAY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(self.len(), w)?;
        for item in self {
            write(item, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        // Cap the up-front reservation: a maliciously inflated count must
        // not itself drive an oversized allocation before each element is
        // actually read and validated.
        let mut out = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            out.push(read(r)?);
        }
        Ok(out)
    }
}

impl<T: Codec> Codec for VecDeque<T> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::ARRAY
    }

    fn encoded_size(&self) -> usize {
        size(&(self.len() as SizeType)) + self.iter().map(size).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::ARRAY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(self.len(), w)?;
        for item in self {
            write(item, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        let mut out = VecDeque::new();
        for _ in 0..count {
            out.push_back(read(r)?);
        }
        Ok(out)
    }
}

impl<T: Codec, const N: usize> Codec for [T; N] {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::ARRAY
    }

    fn encoded_size(&self) -> usize {
        size(&(N as SizeType)) + self.iter().map(size).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::ARRAY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(N, w)?;
        for item in self {
            write(item, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        if count != N {
            return Err(Error::new(ErrorKind::InvalidContainerLength));
        }
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(read::<_, T>(r)?);
        }
        // `N` was just checked equal to `items.len()`.
        match items.try_into() {
            Ok(arr) => Ok(arr),
            Err(_) => Err(Error::new(ErrorKind::InvalidContainerLength)),
        }
    }
}

/// A raw byte blob, encoded with the compact `Binary` tag (a run-length
/// blob, no per-element tags) rather than `Array` of individually-tagged
/// `u8`s.
///
/// `Vec<u8>` itself goes through the blanket `Vec<T>` impl above and so
/// encodes as `Array` of fix-int bytes — correct but not the canonical
/// compact form the integral-element rule calls for. Rust's coherence
/// rules forbid specializing `Vec<T>` for `T = u8` on stable without a
/// dedicated wrapper, the same reason the ecosystem's `serde` reaches for
/// `serde_bytes::ByteBuf` instead of specializing `Vec<u8>` directly.
/// `Bytes` is that wrapper here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(b: Bytes) -> Self {
        b.0
    }
}

impl Codec for Bytes {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::BINARY
    }

    fn encoded_size(&self) -> usize {
        size(&(self.0.len() as SizeType)) + self.0.len()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::BINARY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(self.0.len(), w)?;
        w.write_bytes(&self.0)
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        let remaining = r.remaining();
        if remaining != usize::MAX && count > remaining {
            return Err(Error::new(ErrorKind::ReadLimitReached));
        }
        let mut buf = alloc_vec_u8(count);
        r.read_exact(&mut buf)?;
        Ok(Bytes(buf))
    }
}

#[cfg(feature = "std")]
fn alloc_vec_u8(len: usize) -> Vec<u8> {
    std::vec![0u8; len]
}

#[cfg(not(feature = "std"))]
fn alloc_vec_u8(len: usize) -> Vec<u8> {
    alloc::vec![0u8; len]
}

/// UTF-8 text. The byte length must, per the format's invariant for
/// code-unit containers, divide evenly by the one-byte code unit; for
/// UTF-8 that check is trivially always true and exists to mirror the
/// invariant uniformly across string encodings.
impl Codec for String {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::STRING
    }

    fn encoded_size(&self) -> usize {
        size(&(self.len() as SizeType)) + self.len()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::STRING
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(self.len(), w)?;
        w.write_bytes(self.as_bytes())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        let remaining = r.remaining();
        if remaining != usize::MAX && count > remaining {
            return Err(Error::new(ErrorKind::ReadLimitReached));
        }
        let mut buf = alloc_vec_u8(count);
        r.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|_| Error::new(ErrorKind::InvalidStringLength))
    }
}

impl<K: Codec + Ord, V: Codec> Codec for BTreeMap<K, V> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::MAP
    }

    fn encoded_size(&self) -> usize {
        size(&(self.len() as SizeType))
            + self.iter().map(|(k, v)| size(k) + size(v)).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::MAP
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(self.len(), w)?;
        for (k, v) in self {
            write(k, w)?;
            write(v, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        let mut out = BTreeMap::new();
        for _ in 0..count {
            let k = read(r)?;
            let v = read(r)?;
            out.insert(k, v);
        }
        Ok(out)
    }
}

impl<T: Codec + Ord> Codec for BTreeSet<T> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::ARRAY
    }

    fn encoded_size(&self) -> usize {
        size(&(self.len() as SizeType)) + self.iter().map(size).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::ARRAY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(self.len(), w)?;
        for item in self {
            write(item, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        let mut out = BTreeSet::new();
        for _ in 0..count {
            out.insert(read(r)?);
        }
        Ok(out)
    }
}

#[cfg(feature = "std")]
impl<K: Codec + Eq + std::hash::Hash, V: Codec> Codec for HashMap<K, V> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::MAP
    }

    fn encoded_size(&self) -> usize {
        size(&(self.len() as SizeType))
            + self.iter().map(|(k, v)| size(k) + size(v)).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::MAP
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(self.len(), w)?;
        for (k, v) in self {
            write(k, w)?;
            write(v, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        let mut out = HashMap::with_capacity(count.min(1024));
        for _ in 0..count {
            let k = read(r)?;
            let v = read(r)?;
            out.insert(k, v);
        }
        Ok(out)
    }
}

#[cfg(feature = "std")]
impl<T: Codec + Eq + std::hash::Hash> Codec for HashSet<T> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::ARRAY
    }

    fn encoded_size(&self) -> usize {
        size(&(self.len() as SizeType)) + self.iter().map(size).sum::<usize>()
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::ARRAY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        write_count(self.len(), w)?;
        for item in self {
            write(item, w)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let count = read_count(r)?;
        let mut out = HashSet::with_capacity(count.min(1024));
        for _ in 0..count {
            out.insert(read(r)?);
        }
        Ok(out)
    }
}

macro_rules! impl_tuple {
    ($len:expr; $($name:ident : $idx:tt),+) => {
        impl<$($name: Codec),+> Codec for ($($name,)+) {
            fn prefix(&self) -> EncodingByte {
                EncodingByte::ARRAY
            }

            fn encoded_size(&self) -> usize {
                size(&($len as SizeType)) $(+ size(&self.$idx))+
            }

            fn accepts(tag: EncodingByte) -> bool {
                tag == EncodingByte::ARRAY
            }

            fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
                write_count($len, w)?;
                $( write(&self.$idx, w)?; )+
                Ok(())
            }

            fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
                let count = read_count(r)?;
                if count != $len {
                    return Err(Error::new(ErrorKind::InvalidContainerLength));
                }
                Ok(( $( read::<_, $name>(r)?, )+ ))
            }
        }
    };
}

impl_tuple!(1; A:0);
impl_tuple!(2; A:0, B:1);
impl_tuple!(3; A:0, B:1, C:2);
impl_tuple!(4; A:0, B:1, C:2, D:3);
impl_tuple!(5; A:0, B:1, C:2, D:3, E:4);
impl_tuple!(6; A:0, B:1, C:2, D:3, E:4, F:5);
impl_tuple!(7; A:0, B:1, C:2, D:3, E:4, F:5, G:6);
impl_tuple!(8; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7);
impl_tuple!(9; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8);
impl_tuple!(10; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9);
impl_tuple!(11; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, K:10);
impl_tuple!(12; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, K:10, L:11);
