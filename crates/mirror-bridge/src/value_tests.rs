use std::collections::HashSet;

use crate::value::{CollectionKind, ObjectRef, PrimitiveTag, Value};

#[derive(Debug, PartialEq)]
struct Point(i32, i32);

#[test]
fn object_equality_is_identity() {
    let a = ObjectRef::new("pkg.Point", Point(1, 2));
    let b = ObjectRef::new("pkg.Point", Point(1, 2));

    assert_eq!(a, a.clone());
    assert_ne!(a, b);

    let set: HashSet<_> = [a.clone(), a.clone(), b].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn object_downcast() {
    let obj = ObjectRef::new("pkg.Point", Point(3, 4));

    assert_eq!(obj.class(), "pkg.Point");
    assert_eq!(obj.downcast_ref::<Point>(), Some(&Point(3, 4)));
    assert!(obj.downcast_ref::<String>().is_none());
}

#[test]
fn collection_kind_from_class_name() {
    assert_eq!(
        CollectionKind::from_class_name("java.util.ArrayList"),
        Some(CollectionKind::List)
    );
    assert_eq!(
        CollectionKind::from_class_name("java.util.TreeSet"),
        Some(CollectionKind::Set)
    );
    assert_eq!(
        CollectionKind::from_class_name("java.util.ImmutableCollections$ListN"),
        Some(CollectionKind::List)
    );
    assert_eq!(
        CollectionKind::from_class_name("java.util.Collections$UnmodifiableSet"),
        Some(CollectionKind::Set)
    );
    assert_eq!(CollectionKind::from_class_name("java.util.HashMap"), None);
    assert_eq!(CollectionKind::from_class_name("org.example.WidgetList"), None);
}

#[test]
fn primitive_tags_round_trip_through_class_names() {
    for tag in [
        PrimitiveTag::Boolean,
        PrimitiveTag::Byte,
        PrimitiveTag::Short,
        PrimitiveTag::Integer,
        PrimitiveTag::Long,
        PrimitiveTag::Float,
        PrimitiveTag::Double,
        PrimitiveTag::Character,
        PrimitiveTag::String,
    ] {
        assert_eq!(PrimitiveTag::from_class_name(tag.class_name()), Some(tag));
    }
    assert_eq!(PrimitiveTag::from_class_name("int"), None);
}

#[test]
fn value_conversions() {
    assert_eq!(Value::from(3_i32), Value::Int(3));
    assert_eq!(Value::from("x"), Value::String("x".into()));
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some(true)).as_bool(), Some(true));
    assert_eq!(Value::Short(-2).as_i64(), Some(-2));
}
