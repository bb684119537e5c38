//! nopwire — compact self-describing binary wire format.
//!
//! Chaque valeur encodée commence par un octet `EncodingByte` qui porte à la
//! fois son type logique et, pour les petits entiers, sa valeur (fix-int).
//! Le décodeur n'a besoin d'aucun schéma externe : la forme du flux est
//! entièrement portée par cet alphabet de tags. Voir [`nopwire_core`] pour
//! l'alphabet lui-même et les contrats `Reader`/`Writer`.
//!
//! Ce crate construit, au-dessus de ces primitives, le moteur de codecs :
//! - [`Codec`] : dispatch dirigé par le type, résolu à la compilation
//! - types composites : conteneurs, `Option`, `WireResult`, `Variant`
//! - [`table`] : format d'enregistrement tolérant aux évolutions de schéma
//! - [`handle`] : ressources hors bande référencées par entier
//! - [`fungible`] : compatibilité fil-à-fil entre types apparentés
//! - [`ser`]/[`de`] : façades de haut niveau pour encoder/décoder une valeur

#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

/// Re-export of the primitives crate, named `core` so the macros in this
/// crate can refer to `$crate::core::...` regardless of which of `core`
/// (the language prelude) or `nopwire_core` a downstream crate also uses.
pub use nopwire_core as core;

pub use crate::core::{EncodingByte, Error, ErrorKind, SizeType, Status};

mod buffer;
mod composite;
mod container;
mod de;
mod fungible;
mod handle;
mod primitive;
mod ser;

/// Helper macros (`structure!`, `value_wrapper!`) expand into paths under
/// this module; not meant to be used directly outside generated code.
pub mod structure;

/// Helper functions the `table!` macro expands into; not meant to be
/// called directly outside generated code.
pub mod table;

pub use buffer::{BoundedBuf, LogicalBuffer, UnboundedBuf};
pub use composite::{Variant, VariantSchema, WireResult};
pub use container::Bytes;
pub use de::Deserializer;
pub use fungible::Fungible;
pub use handle::{Handle, HandlePolicy, NullHandlePolicy, UniqueHandle};
pub use ser::Serializer;
pub use table::{ActiveEntry, DeletedEntry, Entry, EntryState};

/// A value that can be written to, and read back from, the wire format.
///
/// Implementations are resolved entirely by the Rust type at the call
/// site — there is no runtime type registry. A type typically picks one
/// fixed tag (e.g. every `Vec<T>` writes `Array`), except the integer
/// types, which pick the narrowest tag that fits the current value.
pub trait Codec: Sized {
    /// The tag this value would be written with. For integers this
    /// depends on the value (fix-int vs a widened form); for most other
    /// types it is a constant of the implementing type.
    fn prefix(&self) -> EncodingByte;

    /// Size in bytes of the payload alone (excluding the tag byte emitted
    /// by [`write`]). [`size`] adds the one tag byte on top of this.
    fn encoded_size(&self) -> usize;

    /// Whether `tag`, as read off the wire, is a value this type accepts.
    /// Must include every tag this type could itself produce via
    /// [`prefix`](Codec::prefix), plus any narrower tag the type widens on
    /// read (e.g. `u32` also accepts `U8`/`U16`).
    fn accepts(tag: EncodingByte) -> bool;

    /// Writes the payload that follows a tag already written by the
    /// caller. `tag` is the exact tag just emitted, handed back so
    /// transparent wrappers (`Option`, `WireResult`) can forward it
    /// without re-deriving it.
    fn write_payload<W: core::io::Writer + ?Sized>(
        &self,
        tag: EncodingByte,
        w: &mut W,
    ) -> Status<()>;

    /// Reads the payload that follows a tag the caller already consumed
    /// and validated against [`accepts`](Codec::accepts).
    fn read_payload<R: core::io::Reader + ?Sized>(tag: EncodingByte, r: &mut R) -> Status<Self>;
}

/// Writes `value`'s tag followed by its payload.
pub fn write<W: core::io::Writer + ?Sized, T: Codec>(value: &T, w: &mut W) -> Status<()> {
    let tag = value.prefix();
    w.write_u8(tag.byte())?;
    value.write_payload(tag, w)
}

/// Reads a tag, checks it against `T::accepts`, then reads the payload.
///
/// Rejects reserved tags outright (invariant 3 of the format: a reserved
/// tag is never valid on the wire) and any tag `T` does not claim.
pub fn read<R: core::io::Reader + ?Sized, T: Codec>(r: &mut R) -> Status<T> {
    let byte = r.read_u8()?;
    let tag = EncodingByte::from_raw(byte);
    if tag.is_reserved() {
        #[cfg(feature = "tracing")]
        tracing::debug!(byte, "reserved encoding byte on the wire");
        return Err(Error::new(ErrorKind::UnexpectedEncodingType));
    }
    if !T::accepts(tag) {
        #[cfg(feature = "tracing")]
        tracing::debug!(?tag, "tag not accepted by target type");
        return Err(Error::new(ErrorKind::UnexpectedEncodingType));
    }
    T::read_payload(tag, r)
}

/// Total wire size of `value`: one tag byte plus its payload.
pub fn size<T: Codec>(value: &T) -> usize {
    1 + value.encoded_size()
}

/// The empty value: tag [`EncodingByte::NIL`], no payload. Used directly by
/// `Option`'s empty case and, explicitly, by `Variant`'s empty case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nil;

impl Codec for Nil {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::NIL
    }

    fn encoded_size(&self) -> usize {
        0
    }

    fn accepts(tag: EncodingByte) -> bool {
        tag == EncodingByte::NIL
    }

    fn write_payload<W: core::io::Writer + ?Sized>(
        &self,
        _tag: EncodingByte,
        _w: &mut W,
    ) -> Status<()> {
        Ok(())
    }

    fn read_payload<R: core::io::Reader + ?Sized>(_tag: EncodingByte, _r: &mut R) -> Status<Self> {
        Ok(Nil)
    }
}

/// Convenient glob import for consumers.
pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::{read, size, write, Codec, Nil, Status};
    pub use crate::{Entry, EntryState, Variant, VariantSchema, WireResult};
    pub use crate::{Fungible, Handle, HandlePolicy, UniqueHandle};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::{SliceReader, VecWriter};

    #[test]
    fn nil_round_trips() {
        let mut w: VecWriter = VecWriter::new();
        write(&Nil, &mut w).unwrap();
        assert_eq!(w.as_slice(), &[EncodingByte::NIL.byte()]);

        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: Nil = read(&mut r).unwrap();
        assert_eq!(back, Nil);
    }

    #[test]
    fn reserved_byte_is_rejected() {
        let reserved = [0x8A];
        let mut r: SliceReader<'_> = SliceReader::new(&reserved);
        let err = read::<_, Nil>(&mut r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEncodingType);
    }
}
