//! User structure and value-wrapper codecs, declared via [`crate::structure`]
//! and [`crate::value_wrapper`]. Rust has no member-pointer introspection
//! to mirror the original implementation's `NOP_STRUCTURE` macro directly,
//! so these are `macro_rules!` declarations the author invokes once per
//! type, grounded on the same shape: a `Structure` tag, a member count,
//! then each member's own encoding in declaration order.

/// Declares [`crate::Codec`] for a plain data structure: `Structure` tag,
/// member count (as `SizeType`), then each field's own encoding in
/// declaration order.
///
/// ```ignore
/// struct Point { x: i32, y: i32 }
/// structure!(Point { x: i32, y: i32 });
/// ```
///
/// Every field type must itself implement `Codec`. Handle-typed fields
/// aren't supported here — they need the `Writer`/`Reader`'s concrete
/// handle type, which this generic impl can't see; write such structures'
/// `Codec` impl by hand, calling [`crate::Handle::write`]/`read` for those
/// fields directly.
#[macro_export]
macro_rules! structure {
    ($name:ident { $($field:ident : $ty:ty),+ $(,)? }) => {
        impl $crate::Codec for $name {
            fn prefix(&self) -> $crate::EncodingByte {
                $crate::EncodingByte::STRUCTURE
            }

            fn encoded_size(&self) -> usize {
                let member_count = $crate::structure::count!($($field),+);
                $crate::size(&(member_count as $crate::SizeType))
                    $(+ $crate::size(&self.$field))+
            }

            fn accepts(tag: $crate::EncodingByte) -> bool {
                tag == $crate::EncodingByte::STRUCTURE
            }

            fn write_payload<W: $crate::core::io::Writer + ?Sized>(
                &self,
                _tag: $crate::EncodingByte,
                w: &mut W,
            ) -> $crate::Status<()> {
                let member_count = $crate::structure::count!($($field),+);
                $crate::write(&(member_count as $crate::SizeType), w)?;
                $( $crate::write(&self.$field, w)?; )+
                Ok(())
            }

            fn read_payload<R: $crate::core::io::Reader + ?Sized>(
                _tag: $crate::EncodingByte,
                r: &mut R,
            ) -> $crate::Status<Self> {
                let declared: $crate::SizeType = $crate::read(r)?;
                let expected = $crate::structure::count!($($field),+);
                if declared as usize != expected {
                    return Err($crate::Error::new($crate::ErrorKind::InvalidMemberCount));
                }
                Ok(Self { $( $field: $crate::read(r)?, )+ })
            }
        }
    };
}

/// Counts macro repetitions without constructing anything — used by
/// [`crate::structure`] to get the declared field count as a `usize`
/// constant expression.
#[doc(hidden)]
#[macro_export]
macro_rules! __nopwire_count {
    ($($field:ident),+) => {
        <[()]>::len(&[$($crate::structure::__unit!($field)),+])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __nopwire_unit {
    ($field:ident) => {
        ()
    };
}

pub use crate::__nopwire_count as count;
pub use crate::__nopwire_unit as __unit;

/// Declares [`crate::Codec`] for a value wrapper: a structure-like
/// newtype holding exactly one member, whose own tag and payload are
/// forwarded unchanged — the wrapper contributes no bytes of its own.
///
/// ```ignore
/// struct Meters(f64);
/// value_wrapper!(Meters(f64));
/// ```
#[macro_export]
macro_rules! value_wrapper {
    ($name:ident($field_ty:ty)) => {
        impl $crate::Codec for $name {
            fn prefix(&self) -> $crate::EncodingByte {
                $crate::Codec::prefix(&self.0)
            }

            fn encoded_size(&self) -> usize {
                $crate::Codec::encoded_size(&self.0)
            }

            fn accepts(tag: $crate::EncodingByte) -> bool {
                <$field_ty as $crate::Codec>::accepts(tag)
            }

            fn write_payload<W: $crate::core::io::Writer + ?Sized>(
                &self,
                tag: $crate::EncodingByte,
                w: &mut W,
            ) -> $crate::Status<()> {
                $crate::Codec::write_payload(&self.0, tag, w)
            }

            fn read_payload<R: $crate::core::io::Reader + ?Sized>(
                tag: $crate::EncodingByte,
                r: &mut R,
            ) -> $crate::Status<Self> {
                Ok(Self(<$field_ty as $crate::Codec>::read_payload(tag, r)?))
            }
        }

        // The wrapper forwards its member's tag and payload unchanged, so
        // it is wire-identical to the bare member type in both directions.
        impl $crate::Fungible<$field_ty> for $name {}
        impl $crate::Fungible<$name> for $field_ty {}
    };
}
