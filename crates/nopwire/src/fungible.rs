//! Structural "fungibility": two types whose wire encodings are always
//! byte-identical, so a value written as one can be read back as the
//! other. The original implementation enforces this with a C++ template
//! "Protocol" gate comparing structure layouts at compile time; in Rust
//! that becomes an explicit marker trait plus a handful of impls for the
//! closure rules the format itself guarantees (see `spec.md` §4.8 and
//! DESIGN.md's Open Question entry for the parts that stay manual).

use crate::Codec;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Marks that `Self` and `Other` always produce byte-identical wire
/// output and accept each other's tags, so a buffer written from one can
/// be read back as the other.
///
/// Every type is fungible with itself (blanket below). Beyond that, the
/// format's own container rules give a handful of cross-constructor
/// impls for free — array/fixed-array vs. vector, a homogeneous pair vs.
/// a 2-array, a logical buffer vs. a vector. Past those, an author
/// implements this by hand after checking both types declare the same
/// fields, in the same order, with the same wire-compatible element
/// types; there is no derive.
///
/// Symmetric in intent but not required to be implemented both ways —
/// implement both directions explicitly if both are needed.
pub trait Fungible<Other> {}

impl<T> Fungible<T> for T {}

/// A fixed-length array and a dynamically-sized vector both write as
/// `Array`; they differ only in whether the length is part of the type.
impl<T: Codec, const N: usize> Fungible<Vec<T>> for [T; N] {}
impl<T: Codec, const N: usize> Fungible<[T; N]> for Vec<T> {}

/// A homogeneous 2-tuple ("pair") and a 2-element fixed array write the
/// same `Array` of two equally-typed elements.
impl<T: Codec> Fungible<[T; 2]> for (T, T) {}
impl<T: Codec> Fungible<(T, T)> for [T; 2] {}

/// [`crate::UnboundedBuf`] is wire-identical to a plain vector by
/// construction (same `Array` tag, same length-then-elements payload).
impl<T: Codec> Fungible<Vec<T>> for crate::UnboundedBuf<T> {}
impl<T: Codec> Fungible<crate::UnboundedBuf<T>> for Vec<T> {}

/// [`crate::BoundedBuf`] writes the same payload as a vector too; its
/// capacity `N` is a write-time/read-time check, not a wire distinction.
impl<T: Codec, const N: usize> Fungible<Vec<T>> for crate::BoundedBuf<T, N> {}
impl<T: Codec, const N: usize> Fungible<crate::BoundedBuf<T, N>> for Vec<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::{SliceReader, VecWriter};
    use crate::{read, write, Deserializer, Serializer, UnboundedBuf};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct PointV1 {
        x: i32,
        y: i32,
    }
    crate::structure!(PointV1 { x: i32, y: i32 });

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct PointV2 {
        x: i32,
        y: i32,
    }
    crate::structure!(PointV2 { x: i32, y: i32 });

    impl Fungible<PointV2> for PointV1 {}
    impl Fungible<PointV1> for PointV2 {}

    #[test]
    fn fungible_types_share_wire_bytes() {
        let a = PointV1 { x: 1, y: -2 };
        let mut w: VecWriter = VecWriter::new();
        write(&a, &mut w).unwrap();

        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let b: PointV2 = read(&mut r).unwrap();
        assert_eq!(b, PointV2 { x: 1, y: -2 });

        fn assert_fungible<A: Fungible<B>, B>() {}
        assert_fungible::<PointV1, PointV2>();
    }

    #[test]
    fn facade_gate_writes_and_reads_across_fungible_types() {
        let mut ser: Serializer<VecWriter> = Serializer::new(VecWriter::new());
        ser.write_as::<PointV2, _>(&PointV1 { x: 3, y: 4 }).unwrap();

        let mut de: Deserializer<SliceReader<'_>> =
            Deserializer::new(SliceReader::new(ser.get_ref().as_slice()));
        let back = de.read_as::<PointV2, PointV1>().unwrap();
        assert_eq!(back, PointV2 { x: 3, y: 4 });
    }

    #[test]
    fn fixed_array_and_vector_are_mutually_fungible() {
        let a: [i32; 3] = [1, -2, 3];
        let mut w: VecWriter = VecWriter::new();
        write(&a, &mut w).unwrap();
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: Vec<i32> = read(&mut r).unwrap();
        assert_eq!(back, Vec::from([1, -2, 3]));

        fn assert_fungible<A: Fungible<B>, B>() {}
        assert_fungible::<[i32; 3], Vec<i32>>();
        assert_fungible::<Vec<i32>, [i32; 3]>();
    }

    #[test]
    fn unbounded_buf_and_vector_are_mutually_fungible() {
        let buf: UnboundedBuf<u32> = UnboundedBuf::from_vec(Vec::from([5, 6, 7]));
        let mut w: VecWriter = VecWriter::new();
        write(&buf, &mut w).unwrap();
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: Vec<u32> = read(&mut r).unwrap();
        assert_eq!(back, Vec::from([5, 6, 7]));

        fn assert_fungible<A: Fungible<B>, B>() {}
        assert_fungible::<UnboundedBuf<u32>, Vec<u32>>();
        assert_fungible::<Vec<u32>, UnboundedBuf<u32>>();
    }
}
