//! Declared field order through the facade

use crate::common::*;
use std::sync::Arc;
use tessera::reactor::visit_value;

fn ordered_events(value: &Value) -> Result<Vec<Event>, ReactorError> {
    let mut pipeline = PipelineConfig::default()
        .builder()
        .add(CastReactor::new(person_type(), Arc::new(PeopleSchema)))
        .add(FieldOrderReactor::new(Arc::new(person_order())))
        .build(Vec::<Event>::new());
    visit_value(value, &Heap::new(), &mut pipeline)?;
    Ok(pipeline.into_sink())
}

#[test]
fn test_fields_follow_declared_order() {
    // keys visit alphabetically: age, email, name
    let value = map(vec![
        ("age", Value::Int32(41)),
        ("email", "a@b".into()),
        ("name", "ann".into()),
    ]);
    let events = ordered_events(&value).unwrap();
    assert_eq!(field_names(&events), vec!["name", "age", "email"]);
}

#[test]
fn test_missing_required_field() {
    let value = map(vec![("age", Value::Int32(41))]);
    let err = ordered_events(&value).unwrap_err();
    assert!(matches!(err, ReactorError::MissingFields { .. }));
    assert_eq!(err.message(), "missing field(s): name");
}

#[test]
fn test_cast_to_bytes_writes_declared_order() {
    let tessera = people().with_field_orders(Arc::new(person_order()));
    let value = map(vec![("age", "41".into()), ("name", "ann".into())]);
    let bytes = tessera
        .cast_to_bytes(&value, &Heap::new(), person_type())
        .unwrap();

    let name_at = bytes.windows(4).position(|w| w == b"name").unwrap();
    let age_at = bytes.windows(3).position(|w| w == b"age").unwrap();
    assert!(name_at < age_at);

    let (cast, _) = tessera.cast(&value, &Heap::new(), person_type()).unwrap();
    assert_eq!(tessera.decode(&bytes).unwrap(), cast);
}
