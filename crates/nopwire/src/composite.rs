//! Composite codecs built as thin wrappers over another `Codec`: `Option`
//! (the Optional form, no index), `WireResult` (the Error/value form) and
//! `Variant` (the tagged-union form, `-1` active index for empty).

use crate::core::io::{Reader, Writer};
use crate::core::{EncodingByte, Error, ErrorKind, Status};
use crate::{read, size, write, Codec, Nil};

/// `None` writes a single `Nil` tag; `Some(v)` writes exactly `v`'s own
/// encoding, with no extra wrapper tag.
impl<T: Codec> Codec for Option<T> {
    fn prefix(&self) -> EncodingByte {
        match self {
            None => EncodingByte::NIL,
            Some(v) => v.prefix(),
        }
    }

    fn encoded_size(&self) -> usize {
        match self {
            None => 0,
            Some(v) => v.encoded_size(),
        }
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::NIL || T::accepts(tag)
    }

    fn write_payload<W: Writer + ?Sized>(&self, tag: EncodingByte, w: &mut W) -> Status<()> {
        match self {
            None => Ok(()),
            Some(v) => v.write_payload(tag, w),
        }
    }

    fn read_payload<R: Reader + ?Sized>(tag: EncodingByte, r: &mut R) -> Status<Self> {
        if tag == EncodingByte::NIL {
            Ok(None)
        } else {
            Ok(Some(T::read_payload(tag, r)?))
        }
    }
}

/// The Result form: `Ok(v)` writes exactly `v`'s own encoding; `Err(e)`
/// writes the `Error` tag followed by `e`'s own encoding (`e` is typically
/// a fieldless enum carried via [`crate::enum_codec`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireResult<T, E> {
    /// The successful value.
    Ok(T),
    /// The error value, tagged with `Error` on the wire.
    Err(E),
}

impl<T: Codec, E: Codec> Codec for WireResult<T, E> {
    fn prefix(&self) -> EncodingByte {
        match self {
            WireResult::Ok(v) => v.prefix(),
            WireResult::Err(_) => EncodingByte::ERROR,
        }
    }

    fn encoded_size(&self) -> usize {
        match self {
            WireResult::Ok(v) => v.encoded_size(),
            WireResult::Err(e) => size(e),
        }
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::ERROR || T::accepts(tag)
    }

    fn write_payload<W: Writer + ?Sized>(&self, tag: EncodingByte, w: &mut W) -> Status<()> {
        match self {
            WireResult::Ok(v) => v.write_payload(tag, w),
            WireResult::Err(e) => write(e, w),
        }
    }

    fn read_payload<R: Reader + ?Sized>(tag: EncodingByte, r: &mut R) -> Status<Self> {
        if tag == EncodingByte::ERROR {
            Ok(WireResult::Err(read(r)?))
        } else {
            Ok(WireResult::Ok(T::read_payload(tag, r)?))
        }
    }
}

/// Implemented by a closed, fieldless-variant-holding enum to describe its
/// tagged-union shape for [`Variant`]: which arm is active, how to write
/// and size it, and how to read a given arm back by index. Generated by
/// [`crate::variant`] for a declared enum.
pub trait VariantSchema: Sized {
    /// The active arm's `0..N` index.
    fn active_index(&self) -> i32;

    /// Full tag+payload size of the active arm.
    fn active_size(&self) -> usize;

    /// Writes the active arm's own tag and payload.
    fn write_active<W: Writer + ?Sized>(&self, w: &mut W) -> Status<()>;

    /// Reads the arm selected by `index`.
    fn read_at<R: Reader + ?Sized>(index: i32, r: &mut R) -> Status<Self>;
}

/// A closed tagged union over a declared set of alternative types, wrapped
/// in `Option` to carry the "nothing selected" state: `Variant` prefix,
/// then a signed 32-bit active index (`-1` for empty), then either `Nil`
/// or the active arm's own encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant<V>(pub Option<V>);

impl<V> Variant<V> {
    /// Wraps an active arm.
    pub fn new(value: V) -> Self {
        Self(Some(value))
    }

    /// The empty variant.
    pub fn empty() -> Self {
        Self(None)
    }
}

impl<V: VariantSchema> Codec for Variant<V> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::VARIANT
    }

    fn encoded_size(&self) -> usize {
        match &self.0 {
            None => size(&(-1i32)) + size(&Nil),
            Some(v) => size(&v.active_index()) + v.active_size(),
        }
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::VARIANT
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        match &self.0 {
            None => {
                write(&(-1i32), w)?;
                write(&Nil, w)
            }
            Some(v) => {
                write(&v.active_index(), w)?;
                v.write_active(w)
            }
        }
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let index: i32 = read(r)?;
        if index == -1 {
            let _: Nil = read(r)?;
            Ok(Variant(None))
        } else if index >= 0 {
            Ok(Variant(Some(V::read_at(index, r)?)))
        } else {
            Err(Error::new(ErrorKind::UnexpectedVariantType))
        }
    }
}

/// Declares [`VariantSchema`] for an enum whose every variant holds exactly
/// one payload: `variant!(Msg { 0 => A(MessageA), 1 => B(MessageB) });`
/// Indices must be declared `0..N` contiguously; [`Variant<Msg>`] then adds
/// the empty (`-1`) state on top.
#[macro_export]
macro_rules! variant {
    ($name:ident { $($idx:literal => $arm:ident($ty:ty)),+ $(,)? }) => {
        impl $crate::VariantSchema for $name {
            fn active_index(&self) -> i32 {
                match self {
                    $( $name::$arm(_) => $idx, )+
                }
            }

            fn active_size(&self) -> usize {
                match self {
                    $( $name::$arm(v) => $crate::size(v), )+
                }
            }

            fn write_active<W: $crate::core::io::Writer + ?Sized>(
                &self,
                w: &mut W,
            ) -> $crate::Status<()> {
                match self {
                    $( $name::$arm(v) => $crate::write(v, w), )+
                }
            }

            fn read_at<R: $crate::core::io::Reader + ?Sized>(
                index: i32,
                r: &mut R,
            ) -> $crate::Status<Self> {
                match index {
                    $( $idx => Ok($name::$arm($crate::read(r)?)), )+
                    _ => Err($crate::Error::new($crate::ErrorKind::UnexpectedVariantType)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::{SliceReader, VecWriter};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Msg {
        A(i32),
        B(bool),
    }
    variant!(Msg { 0 => A(i32), 1 => B(bool) });

    #[test]
    fn option_none_is_bare_nil() {
        let v: Option<u32> = None;
        let mut w: VecWriter = VecWriter::new();
        write(&v, &mut w).unwrap();
        assert_eq!(w.as_slice(), &[EncodingByte::NIL.byte()]);
    }

    #[test]
    fn option_some_has_no_extra_wrapper() {
        let v = Some(5u32);
        let mut w: VecWriter = VecWriter::new();
        write(&v, &mut w).unwrap();
        assert_eq!(w.as_slice(), &[0x05]);
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: Option<u32> = read(&mut r).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn variant_empty_writes_sentinel_index_then_nil() {
        let v: Variant<Msg> = Variant::empty();
        let mut w: VecWriter = VecWriter::new();
        write(&v, &mut w).unwrap();
        assert_eq!(
            w.as_slice(),
            &[EncodingByte::VARIANT.byte(), 0xFF, EncodingByte::NIL.byte()]
        );
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: Variant<Msg> = read(&mut r).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn variant_present_writes_index_then_active_arm() {
        let v = Variant::new(Msg::A(10));
        let mut w: VecWriter = VecWriter::new();
        write(&v, &mut w).unwrap();
        assert_eq!(w.as_slice(), &[EncodingByte::VARIANT.byte(), 0x00, 0x0A]);
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: Variant<Msg> = read(&mut r).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn wire_result_ok_is_transparent() {
        let v: WireResult<u32, i32> = WireResult::Ok(5);
        let mut w: VecWriter = VecWriter::new();
        write(&v, &mut w).unwrap();
        assert_eq!(w.as_slice(), &[0x05]);
    }

    #[test]
    fn wire_result_err_carries_error_tag() {
        let v: WireResult<u32, i32> = WireResult::Err(-1);
        let mut w: VecWriter = VecWriter::new();
        write(&v, &mut w).unwrap();
        assert_eq!(w.as_slice(), &[EncodingByte::ERROR.byte(), 0xFF]);
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: WireResult<u32, i32> = read(&mut r).unwrap();
        assert_eq!(back, v);
    }
}
