//! Table codec: a forward/backward-compatible record format keyed by
//! per-entry ids inside a namespace, tolerant of unknown and retired
//! entries. Grounded on `examples/original_source/examples/table.cpp` and
//! the `NOP_TABLE` macro it's built from.
//!
//! Wire shape: `Table` tag, namespace hash (`u64`, via the integer codec),
//! entry count `K` (active entries only), then `K` `(id, payload_size,
//! payload)` triples, each `id` and `payload_size` themselves integer-codec
//! values. A reader walks all `K` triples, matches each `id` against its
//! own declared entries, and silently skips `payload_size` bytes for any
//! id it doesn't recognize or that its own schema marks
//! [`DeletedEntry`] — this is what lets old and new readers interoperate
//! across schema versions (see `spec.md` §4.7 and §6).
//!
//! This implementation's codecs always report an exact `encoded_size`
//! (never a true over-estimate), so write-side padding of a short payload
//! never actually triggers; the read side still opens a bounded region and
//! drains any trailing bytes regardless, to stay correct against a
//! foreign encoder that does over-estimate (see DESIGN.md).

use core::marker::PhantomData;

use crate::core::io::{BoundedReader, Reader, Writer};
use crate::core::{EncodingByte, Error, ErrorKind, SizeType, Status};
use crate::{read, size, write, Codec};

/// Namespace keys matching the original implementation's fixed SipHash
/// keys — stable across processes and builds, not secret.
const NAMESPACE_KEY0: u64 = 0xBAAD_F00D_DEAD_BEEF;
const NAMESPACE_KEY1: u64 = 0x0123_4567_89AB_CDEF;

/// Computes a table's namespace hash from its namespace string. An empty
/// namespace conventionally hashes to `0` (no namespace).
pub fn namespace_hash(namespace: &str) -> u64 {
    if namespace.is_empty() {
        return 0;
    }
    use core::hash::Hasher;
    use siphasher::sip::SipHasher13;
    let mut hasher = SipHasher13::new_with_keys(NAMESPACE_KEY0, NAMESPACE_KEY1);
    hasher.write(namespace.as_bytes());
    hasher.finish()
}

/// Marks whether a table's declaration of an entry is still [`Active`] or
/// has been [`Deleted`] — a schema-evolution concept, not a per-value
/// state: declaring an entry `Deleted` reserves its id so an old reader
/// (still declaring the entry `Active`) correctly reads nothing for it,
/// while a new reader skips it outright.
pub trait EntryState {
    /// Whether this declaration is retired. A deleted entry is never
    /// written and, on read, its payload is always skipped regardless of
    /// whether the wire data happens to carry bytes for it.
    const DELETED: bool;
}

/// An entry still part of the live schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveEntry;

impl EntryState for ActiveEntry {
    const DELETED: bool = false;
}

/// An entry retired from the live schema. Its id slot stays reserved so
/// old readers can still skip it safely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletedEntry;

impl EntryState for DeletedEntry {
    const DELETED: bool = true;
}

/// One entry of a table: an optional payload of type `T`, keyed by the
/// compile-time id `ID`, in state `S` (defaults to [`ActiveEntry`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T, const ID: u64, S: EntryState = ActiveEntry> {
    value: Option<T>,
    _state: PhantomData<S>,
}

impl<T, const ID: u64, S: EntryState> Entry<T, ID, S> {
    /// This entry's declared id.
    pub const ENTRY_ID: u64 = ID;

    /// An empty entry.
    pub fn empty() -> Self {
        Self { value: None, _state: PhantomData }
    }

    /// An entry holding `value`.
    pub fn new(value: T) -> Self {
        Self { value: Some(value), _state: PhantomData }
    }

    /// Borrows the value, if present.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Mutably borrows the value, if present.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Sets the value, overwriting any previous one.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Takes the value, leaving the entry empty.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Whether the entry currently holds no value.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl<T, const ID: u64, S: EntryState> Default for Entry<T, ID, S> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Extracts `ID` from an entry reference without naming its concrete type.
/// Used by the `table!` macro's generated id-matching loop.
pub fn entry_id<T, const ID: u64, S: EntryState>(_entry: &Entry<T, ID, S>) -> u64 {
    ID
}

/// Whether an entry is active and currently holds a value — the predicate
/// that decides whether the write side emits it at all.
pub fn is_active_nonempty<T, const ID: u64, S: EntryState>(entry: &Entry<T, ID, S>) -> bool {
    !S::DELETED && entry.value.is_some()
}

/// Full tag+payload size a currently-active, non-empty entry would occupy
/// inside its table, including its own id/payload-size header.
pub fn entry_size<T: Codec, const ID: u64, S: EntryState>(entry: &Entry<T, ID, S>) -> usize {
    let value = entry.value.as_ref().expect("caller checked is_active_nonempty");
    size(&(ID as SizeType)) + size(&(size(value) as SizeType)) + size(value)
}

/// Writes one active, non-empty entry's `(id, payload_size, payload)`
/// triple. Callers must have already checked
/// [`is_active_nonempty`].
pub fn write_entry<T: Codec, const ID: u64, S: EntryState, W: Writer + ?Sized>(
    entry: &Entry<T, ID, S>,
    w: &mut W,
) -> Status<()> {
    let value = entry.value.as_ref().expect("caller checked is_active_nonempty");
    let payload_len = size(value);
    write(&(ID as SizeType), w)?;
    write(&(payload_len as SizeType), w)?;
    write(value, w)
}

/// Reads one entry's payload once its id has already matched `entry`'s.
/// Deleted entries, by declaration, are always skipped rather than
/// decoded — matching declared-deleted wire data this implementation
/// itself never produces, but a foreign encoder still might.
pub fn read_entry<T: Codec, const ID: u64, S: EntryState, R: Reader + ?Sized>(
    entry: &mut Entry<T, ID, S>,
    payload_size: usize,
    r: &mut R,
) -> Status<()> {
    if S::DELETED {
        return r.skip(payload_size);
    }
    if entry.value.is_some() {
        return Err(Error::new(ErrorKind::DuplicateTableEntry));
    }
    let mut bounded = BoundedReader::new(r, payload_size)?;
    let value = read::<_, T>(&mut bounded)?;
    bounded.finish()?;
    entry.value = Some(value);
    Ok(())
}

/// Writes a table's namespace hash header.
pub fn write_namespace_hash<W: Writer + ?Sized>(hash: u64, w: &mut W) -> Status<()> {
    write(&hash, w)
}

/// Reads and checks a table's namespace hash header against `expected`.
pub fn expect_namespace_hash<R: Reader + ?Sized>(expected: u64, r: &mut R) -> Status<()> {
    let got: u64 = read(r)?;
    if got != expected {
        return Err(Error::new(ErrorKind::InvalidTableHash));
    }
    Ok(())
}

/// Declares the [`crate::Codec`] implementation for a table struct whose
/// fields are all [`Entry`] values, from the struct's own namespace string
/// and field list:
///
/// ```ignore
/// #[derive(Default)]
/// struct Player {
///     name: Entry<String, 0>,
///     score: Entry<u32, 1>,
/// }
/// table!(Player, "Player", [name, score]);
/// ```
///
/// The struct must derive (or otherwise implement) [`Default`] — a freshly
/// read table starts from `Self::default()` with every field empty, then
/// fills in whichever entries the wire data names.
#[macro_export]
macro_rules! table {
    ($name:ident, $namespace:expr, [$($field:ident),+ $(,)?]) => {
        impl $name {
            /// This table's namespace hash, gating cross-build wire
            /// compatibility.
            pub fn namespace_hash() -> u64 {
                $crate::table::namespace_hash($namespace)
            }
        }

        impl $crate::Codec for $name {
            fn prefix(&self) -> $crate::EncodingByte {
                $crate::EncodingByte::TABLE
            }

            fn encoded_size(&self) -> usize {
                let active = 0usize $(+ $crate::table::is_active_nonempty(&self.$field) as usize)+;
                let mut n = $crate::size(&Self::namespace_hash())
                    + $crate::size(&(active as $crate::SizeType));
                $(
                    if $crate::table::is_active_nonempty(&self.$field) {
                        n += $crate::table::entry_size(&self.$field);
                    }
                )+
                n
            }

            fn accepts(tag: $crate::EncodingByte) -> bool {
                tag == $crate::EncodingByte::TABLE
            }

            fn write_payload<W: $crate::core::io::Writer + ?Sized>(
                &self,
                _tag: $crate::EncodingByte,
                w: &mut W,
            ) -> $crate::Status<()> {
                $crate::table::write_namespace_hash(Self::namespace_hash(), w)?;
                let active = 0usize $(+ $crate::table::is_active_nonempty(&self.$field) as usize)+;
                $crate::write(&(active as $crate::SizeType), w)?;
                $(
                    if $crate::table::is_active_nonempty(&self.$field) {
                        $crate::table::write_entry(&self.$field, w)?;
                    }
                )+
                Ok(())
            }

            fn read_payload<R: $crate::core::io::Reader + ?Sized>(
                _tag: $crate::EncodingByte,
                r: &mut R,
            ) -> $crate::Status<Self> {
                $crate::table::expect_namespace_hash(Self::namespace_hash(), r)?;
                let count: $crate::SizeType = $crate::read(r)?;
                let mut out = Self::default();
                for _ in 0..count {
                    let id: $crate::SizeType = $crate::read(r)?;
                    let id = id as u64;
                    let payload_size: $crate::SizeType = $crate::read(r)?;
                    let payload_size = payload_size as usize;
                    let mut consumed = false;
                    $(
                        if !consumed && $crate::table::entry_id(&out.$field) == id {
                            consumed = true;
                            $crate::table::read_entry(&mut out.$field, payload_size, r)?;
                        }
                    )+
                    if !consumed {
                        r.skip(payload_size)?;
                    }
                }
                Ok(out)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::{SliceReader, VecWriter};

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    struct Person {
        name: Entry<alloc_string::String, 0>,
        nickname: Entry<alloc_string::String, 1, DeletedEntry>,
    }
    table!(Person, "Person", [name, nickname]);

    #[cfg(feature = "std")]
    mod alloc_string {
        pub use std::string::String;
    }
    #[cfg(not(feature = "std"))]
    mod alloc_string {
        pub use alloc::string::String;
    }

    #[test]
    fn table_wire_form_matches_seed_scenario_shape() {
        let mut p = Person::default();
        p.name.set("Ron Swanson".to_string());
        let mut w: VecWriter = VecWriter::new();
        write(&p, &mut w).unwrap();
        // Table, hash(fixint), count=1(fixint), id=0(fixint),
        // payload_size=13(fixint), String tag, len=11, "Ron Swanson".
        let bytes = w.as_slice();
        assert_eq!(bytes[0], EncodingByte::TABLE.byte());
        assert_eq!(&bytes[bytes.len() - 13..], b"\xBD\x0BRon Swanson".as_slice());
    }

    #[test]
    fn table_round_trips() {
        let mut p = Person::default();
        p.name.set("Ada".to_string());
        let mut w: VecWriter = VecWriter::new();
        write(&p, &mut w).unwrap();
        let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
        let back: Person = read(&mut r).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn table_skips_unknown_entry_id() {
        // hand-encode an extra id=99 entry that `Person` doesn't declare
        let mut raw: VecWriter = VecWriter::new();
        raw.write_u8(EncodingByte::TABLE.byte()).unwrap();
        write(&Person::namespace_hash(), &mut raw).unwrap();
        write(&1u32, &mut raw).unwrap(); // count = 1
        write(&99u32, &mut raw).unwrap(); // unknown id
        let payload = "ignored".to_string();
        write(&(size(&payload) as u32), &mut raw).unwrap();
        write(&payload, &mut raw).unwrap();

        let mut r: SliceReader<'_> = SliceReader::new(raw.as_slice());
        let back: Person = read(&mut r).unwrap();
        assert_eq!(back, Person::default());
    }

    #[test]
    fn table_rejects_hash_mismatch() {
        let mut raw: VecWriter = VecWriter::new();
        raw.write_u8(EncodingByte::TABLE.byte()).unwrap();
        write(&0xDEADu64, &mut raw).unwrap();
        write(&0u32, &mut raw).unwrap();
        let mut r: SliceReader<'_> = SliceReader::new(raw.as_slice());
        let err = read::<_, Person>(&mut r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTableHash);
    }
}
