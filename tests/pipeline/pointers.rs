//! Shared and cyclic values

use crate::common::*;
use tessera::model::ListType;
use tessera::codec::CodecError;

#[test]
fn test_shared_value_cast_once() {
    let p = PointerId::new(1);
    let mut heap = Heap::new();
    heap.insert(p, "7".into());
    let value = Value::List(vec![Value::Pointer(p), Value::Pointer(p)]);
    let expected = TypeReference::list(TYPE_INT32.clone(), true);

    let (cast, out) = Tessera::default().cast(&value, &heap, expected).unwrap();
    assert_eq!(cast, value);
    assert_eq!(out.get(p), Some(&Value::Int32(7)));
}

#[test]
fn test_cycle_survives_validation() {
    let p = PointerId::new(2);
    let mut heap = Heap::new();
    heap.insert(p, Value::List(vec![Value::Int32(1), Value::Pointer(p)]));
    assert!(Tessera::default()
        .validate(&Value::Pointer(p), &heap)
        .is_ok());
}

#[test]
fn test_reference_before_allocation() {
    let err = feed(vec![
        Event::list_start(ListType::new(TYPE_VALUE.clone(), true)),
        Event::reference(PointerId::new(5)),
        Event::end(),
    ])
    .unwrap_err();
    assert_eq!(err.message(), "unrecognized reference: 5");
}

#[test]
fn test_double_allocation() {
    let err = feed(vec![
        Event::list_start(ListType::new(TYPE_VALUE.clone(), true)),
        Event::allocation(TYPE_VALUE.clone(), PointerId::new(5)),
        Event::value(1i32),
        Event::allocation(TYPE_VALUE.clone(), PointerId::new(5)),
        Event::value(2i32),
        Event::end(),
    ])
    .unwrap_err();
    assert_eq!(err.message(), "attempt to redefine reference: 5");
}

#[test]
fn test_pointers_have_no_binary_form() {
    let p = PointerId::new(1);
    let err = Tessera::default().encode(&Value::Pointer(p)).unwrap_err();
    assert!(matches!(
        err,
        TesseraError::Codec(CodecError::Unencodable(_))
    ));

    let mut heap = Heap::new();
    heap.insert(p, Value::Int32(1));
    let err = Tessera::default()
        .cast_to_bytes(&Value::Pointer(p), &heap, TYPE_VALUE.clone())
        .unwrap_err();
    assert!(matches!(
        err.as_reactor(),
        Some(ReactorError::Sink { .. })
    ));
}
