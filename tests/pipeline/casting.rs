//! Casting through the configured pipeline

use crate::common::*;

#[test]
fn test_exact_type_unchanged() {
    let value = person(vec![("name", "ann".into()), ("age", Value::Int32(41))]);
    let (cast, heap) = people().cast(&value, &Heap::new(), person_type()).unwrap();
    assert_eq!(cast, value);
    assert!(heap.is_empty());
}

#[test]
fn test_map_becomes_struct() {
    let value = map(vec![("name", "ann".into()), ("age", "41".into())]);
    let (cast, _) = people().cast(&value, &Heap::new(), person_type()).unwrap();
    assert_eq!(
        cast,
        person(vec![("name", "ann".into()), ("age", Value::Int32(41))])
    );
}

#[test]
fn test_list_of_strings_to_int64() {
    let value = Value::List(vec!["1".into(), "-2".into(), "3.9".into()]);
    let expected = TypeReference::list(TYPE_INT64.clone(), false);
    let (cast, _) = Tessera::default()
        .cast(&value, &Heap::new(), expected)
        .unwrap();
    assert_eq!(
        cast,
        Value::List(vec![Value::Int64(1), Value::Int64(-2), Value::Int64(3)])
    );
}

#[test]
fn test_empty_list_rejected_when_not_allowed() {
    let expected = TypeReference::list(TYPE_INT32.clone(), false);
    let err = Tessera::default()
        .cast(&Value::List(vec![]), &Heap::new(), expected)
        .unwrap_err();
    assert_eq!(err.as_reactor().unwrap().message(), "List is empty");
}

#[test]
fn test_unrecognized_field() {
    let value = map(vec![("name", "ann".into()), ("nickname", "a".into())]);
    let err = people()
        .cast(&value, &Heap::new(), person_type())
        .unwrap_err();
    let reactor = err.as_reactor().unwrap();
    assert!(matches!(reactor, ReactorError::UnrecognizedField { .. }));
    assert_eq!(reactor.message(), "unrecognized field: nickname");
}

#[test]
fn test_restricted_optional_field() {
    let ok = map(vec![("name", "ann".into()), ("email", "a@b".into())]);
    assert!(people().cast(&ok, &Heap::new(), person_type()).is_ok());

    let bad = map(vec![("name", "ann".into()), ("email", "nope".into())]);
    let err = people()
        .cast(&bad, &Heap::new(), person_type())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"email: Value "nope" does not satisfy restriction ".+@.+""#
    );
}

#[test]
fn test_null_for_required_type() {
    let value = map(vec![("name", Value::Null)]);
    let err = people()
        .cast(&value, &Heap::new(), person_type())
        .unwrap_err();
    assert_eq!(err.to_string(), "name: Value is null");
}

#[test]
fn test_scalar_where_list_expected() {
    let expected = TypeReference::list(TYPE_INT32.clone(), true);
    let err = Tessera::default()
        .cast(&Value::Int32(1), &Heap::new(), expected)
        .unwrap_err();
    assert!(matches!(
        err.as_reactor(),
        Some(ReactorError::TypeCast { .. })
    ));
}

#[test]
fn test_validate_top_type() {
    let mut config = TesseraConfig::default();
    config.pipeline.top_type = TopType::Struct;
    let tessera = Tessera::new(config);

    let err = tessera
        .validate(&map(vec![("name", "ann".into())]), &Heap::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "Expected struct but got map start");
    assert!(tessera
        .validate(&person(vec![("name", "ann".into())]), &Heap::new())
        .is_ok());
}
