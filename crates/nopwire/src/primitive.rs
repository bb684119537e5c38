//! Codec pour les types scalaires : `bool`, `char`, entiers signés/non
//! signés, flottants IEEE-754.
//!
//! Les entiers choisissent le tag le plus étroit qui porte la valeur
//! (fix-int, puis largeur croissante) ; le décodeur accepte en retour tout
//! tag plus étroit que le type cible, de sorte qu'un `u32` lu depuis un flux
//! qui a choisi `U8` fonctionne sans widening explicite côté appelant.

use crate::core::io::{Reader, Writer};
use crate::core::{EncodingByte, Error, ErrorKind, Status};
use crate::Codec;

fn fit_unsigned(v: u64) -> (EncodingByte, u8) {
    if v <= 0x7F {
        (EncodingByte::fixint_for_i64(v as i64).expect("fits fixint range"), 0)
    } else if v <= u8::MAX as u64 {
        (EncodingByte::U8, 1)
    } else if v <= u16::MAX as u64 {
        (EncodingByte::U16, 2)
    } else if v <= u32::MAX as u64 {
        (EncodingByte::U32, 4)
    } else {
        (EncodingByte::U64, 8)
    }
}

fn fit_signed(v: i64) -> (EncodingByte, u8) {
    if (-64..128).contains(&v) {
        (EncodingByte::fixint_for_i64(v).expect("fits fixint range"), 0)
    } else if (i8::MIN as i64..=i8::MAX as i64).contains(&v) {
        (EncodingByte::I8, 1)
    } else if (i16::MIN as i64..=i16::MAX as i64).contains(&v) {
        (EncodingByte::I16, 2)
    } else if (i32::MIN as i64..=i32::MAX as i64).contains(&v) {
        (EncodingByte::I32, 4)
    } else {
        (EncodingByte::I64, 8)
    }
}

fn write_unsigned_payload<W: Writer + ?Sized>(v: u64, width: u8, w: &mut W) -> Status<()> {
    match width {
        0 => Ok(()),
        1 => w.write_u8(v as u8),
        2 => w.write_bytes(&(v as u16).to_le_bytes()),
        4 => w.write_bytes(&(v as u32).to_le_bytes()),
        8 => w.write_bytes(&v.to_le_bytes()),
        _ => unreachable!("width is always 0, 1, 2, 4 or 8"),
    }
}

fn write_signed_payload<W: Writer + ?Sized>(v: i64, width: u8, w: &mut W) -> Status<()> {
    match width {
        0 => Ok(()),
        1 => w.write_u8(v as i8 as u8),
        2 => w.write_bytes(&(v as i16).to_le_bytes()),
        4 => w.write_bytes(&(v as i32).to_le_bytes()),
        8 => w.write_bytes(&v.to_le_bytes()),
        _ => unreachable!("width is always 0, 1, 2, 4 or 8"),
    }
}

fn read_unsigned_payload<R: Reader + ?Sized>(tag: EncodingByte, r: &mut R) -> Status<u64> {
    if tag.is_fixint() {
        if tag.is_negative_fixint() {
            return Err(Error::new(ErrorKind::UnexpectedEncodingType));
        }
        return Ok(tag.fixint_value() as u64);
    }
    if tag == EncodingByte::U8 {
        return Ok(r.read_u8()? as u64);
    }
    if tag == EncodingByte::U16 {
        let mut b = [0u8; 2];
        r.read_exact(&mut b)?;
        return Ok(u16::from_le_bytes(b) as u64);
    }
    if tag == EncodingByte::U32 {
        let mut b = [0u8; 4];
        r.read_exact(&mut b)?;
        return Ok(u32::from_le_bytes(b) as u64);
    }
    if tag == EncodingByte::U64 {
        let mut b = [0u8; 8];
        r.read_exact(&mut b)?;
        return Ok(u64::from_le_bytes(b));
    }
    Err(Error::new(ErrorKind::UnexpectedEncodingType))
}

fn read_signed_payload<R: Reader + ?Sized>(tag: EncodingByte, r: &mut R) -> Status<i64> {
    if tag.is_fixint() {
        return Ok(tag.fixint_value());
    }
    if tag == EncodingByte::I8 {
        return Ok(r.read_u8()? as i8 as i64);
    }
    if tag == EncodingByte::I16 {
        let mut b = [0u8; 2];
        r.read_exact(&mut b)?;
        return Ok(i16::from_le_bytes(b) as i64);
    }
    if tag == EncodingByte::I32 {
        let mut b = [0u8; 4];
        r.read_exact(&mut b)?;
        return Ok(i32::from_le_bytes(b) as i64);
    }
    if tag == EncodingByte::I64 {
        let mut b = [0u8; 8];
        r.read_exact(&mut b)?;
        return Ok(i64::from_le_bytes(b));
    }
    Err(Error::new(ErrorKind::UnexpectedEncodingType))
}

macro_rules! impl_unsigned {
    ($ty:ty, [$($accept:path),+]) => {
        impl Codec for $ty {
            fn prefix(&self) -> EncodingByte {
                fit_unsigned(*self as u64).0
            }

            fn encoded_size(&self) -> usize {
                fit_unsigned(*self as u64).1 as usize
            }

            fn accepts(tag: EncodingByte) -> bool {
                (tag.is_fixint() && !tag.is_negative_fixint()) || matches!(tag, $($accept)|+)
            }

            fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
                let (_, width) = fit_unsigned(*self as u64);
                write_unsigned_payload(*self as u64, width, w)
            }

            fn read_payload<R: Reader + ?Sized>(tag: EncodingByte, r: &mut R) -> Status<Self> {
                Ok(read_unsigned_payload(tag, r)? as Self)
            }
        }
    };
}

macro_rules! impl_signed {
    ($ty:ty, [$($accept:path),+]) => {
        impl Codec for $ty {
            fn prefix(&self) -> EncodingByte {
                fit_signed(*self as i64).0
            }

            fn encoded_size(&self) -> usize {
                fit_signed(*self as i64).1 as usize
            }

            fn accepts(tag: EncodingByte) -> bool {
                tag.is_fixint() || matches!(tag, $($accept)|+)
            }

            fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
                let (_, width) = fit_signed(*self as i64);
                write_signed_payload(*self as i64, width, w)
            }

            fn read_payload<R: Reader + ?Sized>(tag: EncodingByte, r: &mut R) -> Status<Self> {
                Ok(read_signed_payload(tag, r)? as Self)
            }
        }
    };
}

impl_unsigned!(u8, [EncodingByte::U8]);
impl_unsigned!(u16, [EncodingByte::U8, EncodingByte::U16]);
impl_unsigned!(u32, [EncodingByte::U8, EncodingByte::U16, EncodingByte::U32]);
impl_unsigned!(u64, [EncodingByte::U8, EncodingByte::U16, EncodingByte::U32, EncodingByte::U64]);

impl_signed!(i8, [EncodingByte::I8]);
impl_signed!(i16, [EncodingByte::I8, EncodingByte::I16]);
impl_signed!(i32, [EncodingByte::I8, EncodingByte::I16, EncodingByte::I32]);
impl_signed!(i64, [EncodingByte::I8, EncodingByte::I16, EncodingByte::I32, EncodingByte::I64]);

impl Codec for bool {
    fn prefix(&self) -> EncodingByte {
        if *self {
            EncodingByte::TRUE
        } else {
            EncodingByte::FALSE
        }
    }

    fn encoded_size(&self) -> usize {
        0
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::FALSE || tag == EncodingByte::TRUE
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, _w: &mut W) -> Status<()> {
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(tag: EncodingByte, _r: &mut R) -> Status<Self> {
        Ok(tag == EncodingByte::TRUE)
    }
}

impl Codec for char {
    fn prefix(&self) -> EncodingByte {
        fit_unsigned(*self as u64).0
    }

    fn encoded_size(&self) -> usize {
        fit_unsigned(*self as u64).1 as usize
    }

    fn accepts(tag: EncodingByte) -> bool {
        (tag.is_fixint() && !tag.is_negative_fixint())
            || matches!(tag, EncodingByte::U8 | EncodingByte::U16 | EncodingByte::U32)
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        let (_, width) = fit_unsigned(*self as u64);
        write_unsigned_payload(*self as u64, width, w)
    }

    fn read_payload<R: Reader + ?Sized>(tag: EncodingByte, r: &mut R) -> Status<Self> {
        let v = read_unsigned_payload(tag, r)?;
        u32::try_from(v)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| Error::new(ErrorKind::UnexpectedEncodingType))
    }
}

impl Codec for f32 {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::F32
    }

    fn encoded_size(&self) -> usize {
        4
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::F32
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        w.write_bytes(&self.to_le_bytes())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let mut b = [0u8; 4];
        r.read_exact(&mut b)?;
        Ok(f32::from_le_bytes(b))
    }
}

impl Codec for f64 {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::F64
    }

    fn encoded_size(&self) -> usize {
        8
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::F64
    }

    fn write_payload<W: Writer + ?Sized>(&self, _tag: EncodingByte, w: &mut W) -> Status<()> {
        w.write_bytes(&self.to_le_bytes())
    }

    fn read_payload<R: Reader + ?Sized>(_tag: EncodingByte, r: &mut R) -> Status<Self> {
        let mut b = [0u8; 8];
        r.read_exact(&mut b)?;
        Ok(f64::from_le_bytes(b))
    }
}

/// Declares a `Codec` impl for a fieldless enum, encoded exactly as its
/// underlying integer representation (its accepted tag set is therefore
/// that of `$repr`). `$name` must implement `Copy` and
/// `TryFrom<$repr, Error = E>` for some `E`.
#[macro_export]
macro_rules! enum_codec {
    ($name:ty as $repr:ty) => {
        impl $crate::Codec for $name {
            fn prefix(&self) -> $crate::EncodingByte {
                $crate::Codec::prefix(&(*self as $repr))
            }

            fn encoded_size(&self) -> usize {
                $crate::Codec::encoded_size(&(*self as $repr))
            }

            fn accepts(tag: $crate::EncodingByte) -> bool {
                <$repr as $crate::Codec>::accepts(tag)
            }

            fn write_payload<W: $crate::core::io::Writer + ?Sized>(
                &self,
                tag: $crate::EncodingByte,
                w: &mut W,
            ) -> $crate::Status<()> {
                $crate::Codec::write_payload(&(*self as $repr), tag, w)
            }

            fn read_payload<R: $crate::core::io::Reader + ?Sized>(
                tag: $crate::EncodingByte,
                r: &mut R,
            ) -> $crate::Status<Self> {
                let v = <$repr as $crate::Codec>::read_payload(tag, r)?;
                <$name as core::convert::TryFrom<$repr>>::try_from(v)
                    .map_err(|_| $crate::Error::new($crate::ErrorKind::UnexpectedEncodingType))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::{SliceReader, VecWriter};
    use crate::{read, size, write};

    fn round_trip<T: Codec + PartialEq + core::fmt::Debug>(value: T) {
        let mut w: VecWriter = VecWriter::new();
        write(&value, &mut w).unwrap();
        assert_eq!(w.as_slice().len(), size(&value));
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: T = read(&mut r).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn small_unsigned_is_a_single_fixint_byte() {
        let mut w: VecWriter = VecWriter::new();
        write(&5u32, &mut w).unwrap();
        assert_eq!(w.as_slice(), &[0x05]);
    }

    #[test]
    fn widened_unsigned_uses_u8_tag() {
        let mut w: VecWriter = VecWriter::new();
        write(&200u32, &mut w).unwrap();
        assert_eq!(w.as_slice(), &[EncodingByte::U8.byte(), 200]);
    }

    #[test]
    fn negative_fixint_round_trips() {
        round_trip(-1i32);
        round_trip(-64i8);
    }

    #[test]
    fn widened_forms_round_trip() {
        round_trip(70_000u32);
        round_trip(i64::MIN);
        round_trip(u64::MAX);
    }

    #[test]
    fn narrower_tag_widens_into_larger_target() {
        let mut w: VecWriter = VecWriter::new();
        write(&5u8, &mut w).unwrap();
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: u64 = read(&mut r).unwrap();
        assert_eq!(back, 5);
    }

    #[test]
    fn bool_and_char_round_trip() {
        round_trip(true);
        round_trip(false);
        round_trip('A');
        round_trip('€');
    }

    #[test]
    fn floats_round_trip() {
        round_trip(1.5f32);
        round_trip(-0.0f64);
    }
}
