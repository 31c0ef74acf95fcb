//! Event locations and error locations

use crate::common::*;

#[test]
fn test_nested_map_paths() {
    let value = map(vec![
        ("f1", Value::List(vec![Value::Int32(1), Value::Int32(2)])),
        ("f2", map(vec![("g1", Value::Int32(3))])),
    ]);
    let events = events_through(PipelineConfig::default(), &value, &Heap::new());
    assert_eq!(value_paths(&events), vec!["f1.0", "f1.1", "f2.g1"]);
}

#[test]
fn test_paths_disabled() {
    let config = PipelineConfig {
        set_paths: false,
        ..PipelineConfig::default()
    };
    let value = map(vec![("f1", Value::Int32(1))]);
    let events = events_through(config, &value, &Heap::new());
    assert!(events.iter().all(|e| e.path.is_none()));
}

#[test]
fn test_cast_error_names_list_element_field() {
    let value = Value::List(vec![
        map(vec![("name", "ann".into()), ("age", "41".into())]),
        map(vec![("name", "bob".into()), ("age", "old".into())]),
    ]);
    let expected = TypeReference::list(person_type(), true);
    let err = people().cast(&value, &Heap::new(), expected).unwrap_err();
    let reactor = err.as_reactor().unwrap();
    assert_eq!(reactor.path().unwrap().to_string(), "1.age");
    assert_eq!(reactor.message(), "Invalid numeric value: \"old\"");
    assert_eq!(err.to_string(), "1.age: Invalid numeric value: \"old\"");
}

#[test]
fn test_root_error_has_no_location() {
    let err = Tessera::default()
        .cast(&Value::from("x"), &Heap::new(), TYPE_INT32.clone())
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid numeric value: \"x\"");
}
