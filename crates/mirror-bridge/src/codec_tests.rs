use indoc::indoc;
use serde_json::json;

use crate::codec::{CodecError, WireValue, decode_value, encode_value};
use crate::instantiate::{Placeholder, PlaceholderInstantiator};
use crate::registry::{Handle, ObjectRegistry, Role};
use crate::value::{CollectionKind, ObjectRef, Value};

fn encode_json(value: &Value, registry: &mut ObjectRegistry) -> serde_json::Value {
    serde_json::to_value(encode_value(value, registry).unwrap()).unwrap()
}

#[test]
fn primitives_carry_their_wrapper_class() {
    let mut registry = ObjectRegistry::new(Role::Caller);

    assert_eq!(
        encode_json(&Value::Int(42), &mut registry),
        json!({"type": "primitive", "value": 42, "class_type": "java.lang.Integer"})
    );
    assert_eq!(
        encode_json(&Value::Char('x'), &mut registry),
        json!({"type": "primitive", "value": "x", "class_type": "java.lang.Character"})
    );
    assert_eq!(
        encode_json(&Value::Null, &mut registry),
        json!({"type": "null"})
    );
}

#[test]
fn objects_are_registered_on_first_encode() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let widget = ObjectRef::new("pkg.Widget", ());

    let first = encode_json(&Value::Object(widget.clone()), &mut registry);
    let second = encode_json(&Value::Object(widget.clone()), &mut registry);

    assert_eq!(
        first,
        json!({"type": "marked", "objectId": 0, "class_type": "pkg.Widget"})
    );
    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
}

#[test]
fn composites_encode_element_wise() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let value = Value::Array(vec![
        Value::Collection(CollectionKind::Set, vec![Value::from("a")]),
        Value::Long(1 << 40),
    ]);

    let json = serde_json::to_string_pretty(&encode_value(&value, &mut registry).unwrap()).unwrap();

    insta::assert_snapshot!(json, @r#"
    {
      "type": "array",
      "elements": [
        {
          "type": "collection",
          "elements": [
            {
              "type": "primitive",
              "value": "a",
              "class_type": "java.lang.String"
            }
          ],
          "class_type": "java.util.HashSet"
        },
        {
          "type": "primitive",
          "value": 1099511627776,
          "class_type": "java.lang.Long"
        }
      ]
    }
    "#);
}

#[test]
fn non_finite_floats_are_unsupported() {
    let mut registry = ObjectRegistry::new(Role::Caller);

    let err = encode_value(&Value::Double(f64::NAN), &mut registry).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedValue(_)));

    let err = encode_value(&Value::Float(f32::INFINITY), &mut registry).unwrap_err();
    assert_eq!(err.to_string(), "cannot encode non-finite float inf");
}

#[test]
fn decode_restores_values() {
    let mut registry = ObjectRegistry::new(Role::Executor);
    let wire: WireValue = serde_json::from_str(indoc! {r#"
        {"type": "collection", "class_type": "java.util.LinkedList", "elements": [
            {"type": "primitive", "value": 7, "class_type": "java.lang.Byte"},
            {"type": "primitive", "value": 1.5, "class_type": "java.lang.Float"},
            {"type": "null"}
        ]}
    "#})
    .unwrap();

    let value = decode_value(wire, &mut registry, &PlaceholderInstantiator).unwrap();

    assert_eq!(
        value,
        Value::Collection(
            CollectionKind::List,
            vec![Value::Byte(7), Value::Float(1.5), Value::Null]
        )
    );
}

#[test]
fn unknown_handle_becomes_a_registered_placeholder() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let wire = WireValue::Marked {
        object_id: Handle(7),
        class_type: Some("pkg.Widget".into()),
    };

    let first = decode_value(wire.clone(), &mut registry, &PlaceholderInstantiator).unwrap();
    let second = decode_value(wire, &mut registry, &PlaceholderInstantiator).unwrap();

    let obj = first.as_object().unwrap();
    assert_eq!(obj.class(), "pkg.Widget");
    assert_eq!(
        obj.downcast_ref::<Placeholder>().unwrap().class,
        "pkg.Widget"
    );
    assert!(registry.get(Handle(7)).unwrap().ptr_eq(obj));
    assert!(second.as_object().unwrap().ptr_eq(obj));
    assert_eq!(registry.len(), 1);
}

#[test]
fn unknown_handle_without_class_is_not_found() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let wire = WireValue::Marked {
        object_id: Handle(9),
        class_type: None,
    };

    let err = decode_value(wire, &mut registry, &PlaceholderInstantiator).unwrap_err();

    assert!(matches!(err, CodecError::ObjectNotFound(Handle(9))));
}

#[test]
fn rejects_unknown_tags_and_bad_literals() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let decode = |json: &str, registry: &mut ObjectRegistry| {
        let wire: WireValue = serde_json::from_str(json).unwrap();
        decode_value(wire, registry, &PlaceholderInstantiator).unwrap_err()
    };

    let err = decode(
        r#"{"type": "primitive", "value": 1, "class_type": "java.math.BigInteger"}"#,
        &mut registry,
    );
    assert_eq!(err.to_string(), "unknown primitive type `java.math.BigInteger`");

    let err = decode(
        r#"{"type": "collection", "elements": [], "class_type": "java.util.HashMap"}"#,
        &mut registry,
    );
    assert_eq!(err.to_string(), "unknown collection type `java.util.HashMap`");

    let err = decode(
        r#"{"type": "primitive", "value": 300, "class_type": "java.lang.Byte"}"#,
        &mut registry,
    );
    assert_eq!(err.to_string(), "invalid `java.lang.Byte` literal 300");

    let err = decode(
        r#"{"type": "primitive", "value": "ab", "class_type": "java.lang.Character"}"#,
        &mut registry,
    );
    assert!(matches!(err, CodecError::InvalidLiteral { .. }));
}
