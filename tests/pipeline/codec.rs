//! Binary round trips through the facade

use crate::common::*;
use proptest::prelude::*;
use tessera::codec::{CodecError, Tag};

#[test]
fn test_struct_round_trip() {
    let value = person(vec![
        ("name", "ann".into()),
        ("age", Value::Int32(41)),
        (
            "email",
            Value::List(vec![Value::Buffer(vec![0, 1, 2]), Value::Null]),
        ),
    ]);
    let tessera = Tessera::default();
    let bytes = tessera.encode(&value).unwrap();
    assert_eq!(bytes[0], Tag::Struct.as_u8());
    assert_eq!(*bytes.last().unwrap(), Tag::End.as_u8());
    assert_eq!(tessera.decode(&bytes).unwrap(), value);
}

#[test]
fn test_unknown_tag_rejected() {
    let err = Tessera::default().decode(&[0x18]).unwrap_err();
    assert!(matches!(err, TesseraError::Codec(CodecError::UnknownTag(0x18))));
}

#[test]
fn test_cast_then_encode_matches_encoding_the_cast_value() {
    let tessera = people();
    let value = map(vec![("name", "ann".into()), ("age", "41".into())]);
    let bytes = tessera
        .cast_to_bytes(&value, &Heap::new(), person_type())
        .unwrap();
    let (cast, _) = tessera.cast(&value, &Heap::new(), person_type()).unwrap();
    assert_eq!(bytes, tessera.encode(&cast).unwrap());
}

proptest! {
    #[test]
    fn prop_flat_map_round_trip(
        entries in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8)
    ) {
        let value = map(entries.iter().map(|(k, v)| (k.as_str(), Value::Int64(*v))).collect());
        let tessera = Tessera::default();
        let bytes = tessera.encode(&value).unwrap();
        prop_assert_eq!(tessera.decode(&bytes).unwrap(), value);
    }
}
