//! Byte-for-byte reproductions of the format's worked examples, run as
//! black-box integration tests against the public API only.

use nopwire::core::io::{SliceReader, VecWriter};
use nopwire::{read, write, Bytes, Codec, EncodingByte, ErrorKind};

#[test]
fn small_unsigned() {
    let mut w: VecWriter = VecWriter::new();
    write(&5u32, &mut w).unwrap();
    assert_eq!(w.as_slice(), &[0x05]);

    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    assert_eq!(read::<_, u32>(&mut r).unwrap(), 5);

    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    assert_eq!(read::<_, u64>(&mut r).unwrap(), 5);
}

#[test]
fn widened_unsigned() {
    let mut w: VecWriter = VecWriter::new();
    write(&200u32, &mut w).unwrap();
    assert_eq!(w.as_slice(), &[0x80, 0xC8]);

    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    assert_eq!(read::<_, u32>(&mut r).unwrap(), 200);
}

#[test]
fn byte_vector() {
    let mut w: VecWriter = VecWriter::new();
    write(&Bytes(Vec::from([1u8, 2, 3, 4])), &mut w).unwrap();
    assert_eq!(w.as_slice(), &[0xBC, 0x04, 1, 2, 3, 4]);

    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    let array: [u8; 4] = {
        let Bytes(v) = read(&mut r).unwrap();
        v.try_into().unwrap()
    };
    assert_eq!(array, [1, 2, 3, 4]);
}

#[test]
fn two_element_tuple_as_array() {
    let mut w: VecWriter = VecWriter::new();
    write(&(10i32, "foo".to_string()), &mut w).unwrap();
    assert_eq!(w.as_slice(), &[0xBA, 0x02, 0x0A, 0xBD, 0x03, b'f', b'o', b'o']);

    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    let (a, b): (i32, String) = read(&mut r).unwrap();
    assert_eq!((a, b.as_str()), (10, "foo"));
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Msg {
    A(i32),
    B(String),
}
nopwire::variant!(Msg { 0 => A(i32), 1 => B(String) });

#[test]
fn variant_present_matches_wire_form() {
    use nopwire::Variant;
    let v = Variant::new(Msg::B("foo".to_string()));
    let mut w: VecWriter = VecWriter::new();
    write(&v, &mut w).unwrap();
    assert_eq!(w.as_slice(), &[0xB8, 0x01, 0xBD, 0x03, b'f', b'o', b'o']);

    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    let back: Variant<Msg> = read(&mut r).unwrap();
    assert_eq!(back, v);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct PersonV1 {
    name: nopwire::Entry<String, 0>,
}
nopwire::table!(PersonV1, "Person", [name]);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct PersonV2 {
    name: nopwire::Entry<String, 0>,
    nickname: nopwire::Entry<String, 1>,
}
nopwire::table!(PersonV2, "Person", [name, nickname]);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct PersonV1Deleted {
    name: nopwire::Entry<String, 0>,
    nickname: nopwire::Entry<String, 1, nopwire::DeletedEntry>,
}
nopwire::table!(PersonV1Deleted, "Person", [name, nickname]);

#[test]
fn table_single_active_entry_matches_wire_form() {
    let mut p = PersonV1::default();
    p.name.set("Ron Swanson".to_string());
    let mut w: VecWriter = VecWriter::new();
    write(&p, &mut w).unwrap();

    assert_eq!(w.as_slice()[0], EncodingByte::TABLE.byte());
    let tail = &w.as_slice()[w.as_slice().len() - 13..];
    assert_eq!(tail, b"\xBD\x0BRon Swanson".as_slice());
}

#[test]
fn table_forward_compat_newer_reader_sees_absent_field_empty() {
    let mut p = PersonV1::default();
    p.name.set("Ron Swanson".to_string());
    let mut w: VecWriter = VecWriter::new();
    write(&p, &mut w).unwrap();

    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    let richer: PersonV2 = read(&mut r).unwrap();
    assert_eq!(richer.name.get(), Some(&"Ron Swanson".to_string()));
    assert!(richer.nickname.is_empty());
}

#[test]
fn table_forward_and_backward_compat() {
    let mut richer = PersonV2::default();
    richer.name.set("Ron".to_string());
    richer.nickname.set("Duke Silver".to_string());

    // Older reader (lean schema) reads the shared field and silently
    // skips the field it doesn't declare.
    let mut w: VecWriter = VecWriter::new();
    write(&richer, &mut w).unwrap();
    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    let lean: PersonV1 = read(&mut r).unwrap();
    assert_eq!(lean.name.get(), Some(&"Ron".to_string()));

    // A reader that has since deleted the nickname entry also skips it.
    let mut r: SliceReader<'_> = SliceReader::new(w.as_slice());
    let deleted_schema: PersonV1Deleted = read(&mut r).unwrap();
    assert_eq!(deleted_schema.name.get(), Some(&"Ron".to_string()));
    assert!(deleted_schema.nickname.is_empty());

    // Leaner writer, richer reader: the unseen field stays empty.
    let mut lean_writer = PersonV1::default();
    lean_writer.name.set("Leslie".to_string());
    let mut w2: VecWriter = VecWriter::new();
    write(&lean_writer, &mut w2).unwrap();
    let mut r2: SliceReader<'_> = SliceReader::new(w2.as_slice());
    let richer_read: PersonV2 = read(&mut r2).unwrap();
    assert_eq!(richer_read.name.get(), Some(&"Leslie".to_string()));
    assert!(richer_read.nickname.is_empty());
}

#[test]
fn table_hash_mismatch_is_rejected() {
    let mut raw: VecWriter = VecWriter::new();
    nopwire::core::io::Writer::write_u8(&mut raw, EncodingByte::TABLE.byte()).unwrap();
    write(&0x0Eu64, &mut raw).unwrap(); // wrong hash (14, not PersonV1's real hash)
    write(&0u32, &mut raw).unwrap();

    let mut r: SliceReader<'_> = SliceReader::new(raw.as_slice());
    let err = read::<_, PersonV1>(&mut r).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTableHash);
}
