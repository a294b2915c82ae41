use crate::registry::{Handle, ObjectRegistry, RegistryError, Role};
use crate::value::ObjectRef;

fn obj(class: &str) -> ObjectRef {
    ObjectRef::new(class, ())
}

#[test]
fn reserve_is_lazy_and_stable() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let a = obj("pkg.A");
    let b = obj("pkg.B");

    assert!(registry.is_empty());
    let ha = registry.reserve(&a).unwrap();
    let hb = registry.reserve(&b).unwrap();

    assert_eq!(ha, Handle(0));
    assert_eq!(hb, Handle(1));
    assert_eq!(registry.reserve(&a).unwrap(), ha);
    assert_eq!(registry.len(), 2);
    assert!(registry.get(ha).unwrap().ptr_eq(&a));
    assert_eq!(registry.handle_of(&b), Some(hb));
}

#[test]
fn roles_use_disjoint_handle_spaces() {
    let mut caller = ObjectRegistry::new(Role::Caller);
    let mut executor = ObjectRegistry::new(Role::Executor);

    let hc = caller.reserve(&obj("pkg.A")).unwrap();
    let he = executor.reserve(&obj("pkg.A")).unwrap();

    assert_eq!(hc, Handle(0));
    assert_eq!(he, Handle(1 << 63));
}

#[test]
fn reserve_skips_handles_bound_by_the_peer() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    registry.insert(Handle(0), obj("pkg.Remote")).unwrap();

    let local = registry.reserve(&obj("pkg.Local")).unwrap();

    assert_eq!(local, Handle(1));
}

#[test]
fn insert_is_idempotent_for_the_same_pair() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let a = obj("pkg.A");

    registry.insert(Handle(7), a.clone()).unwrap();
    registry.insert(Handle(7), a.clone()).unwrap();

    assert_eq!(registry.len(), 1);
}

#[test]
fn insert_keeps_the_mapping_bijective() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let a = obj("pkg.A");
    let b = obj("pkg.B");
    registry.insert(Handle(7), a.clone()).unwrap();

    let err = registry.insert(Handle(7), b).unwrap_err();
    assert_eq!(
        err,
        RegistryError::HandleInUse {
            handle: Handle(7),
            class: "pkg.A".into()
        }
    );

    let err = registry.insert(Handle(8), a).unwrap_err();
    assert_eq!(err.to_string(), "pkg.A is already registered as #7");
}

#[test]
fn distinct_handles_hold_distinct_objects() {
    let mut registry = ObjectRegistry::new(Role::Executor);
    let objects: Vec<_> = (0..16).map(|i| obj(&format!("pkg.T{i}"))).collect();
    for o in &objects {
        registry.reserve(o).unwrap();
    }

    let entries: Vec<_> = registry.iter().collect();
    for (i, (h1, o1)) in entries.iter().enumerate() {
        for (h2, o2) in &entries[i + 1..] {
            assert_ne!(h1, h2);
            assert!(!o1.ptr_eq(o2));
        }
    }
}

#[test]
fn object_lookup_reports_missing_handle() {
    let registry = ObjectRegistry::new(Role::Caller);

    let err = registry.object(Handle(3)).unwrap_err();

    assert_eq!(err.to_string(), "object not found for handle #3");
}

#[test]
fn clear_resets_the_session() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let a = obj("pkg.A");
    registry.reserve(&obj("pkg.X")).unwrap();
    registry.reserve(&a).unwrap();

    registry.clear();

    assert!(registry.is_empty());
    assert_eq!(registry.handle_of(&a), None);
    assert_eq!(registry.reserve(&a).unwrap(), Handle(0));
}

#[test]
fn release_unbinds_both_directions() {
    let mut registry = ObjectRegistry::new(Role::Caller);
    let a = obj("pkg.A");
    let handle = registry.reserve(&a).unwrap();

    let released = registry.release(handle).unwrap();

    assert!(released.ptr_eq(&a));
    assert!(!registry.contains(handle));
    assert_eq!(registry.handle_of(&a), None);
    assert!(registry.release(handle).is_none());
    registry.insert(Handle(9), a.clone()).unwrap();
}
