use mirror_core::Manifest;

use crate::instantiate::{InstantiateError, Instantiator, ManifestInstantiator, Placeholder};
use crate::value::ObjectRef;

#[derive(Debug, PartialEq)]
struct ServerImpl;

fn manifest() -> Manifest {
    Manifest::from_json(
        r#"{
            "types": {
                "org.example.Server": "mirror.example.Server",
                "org.example.World": "mirror.example.World"
            },
            "implementations": {
                "org.example.Server": "mirror.example.ServerImpl"
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn interfaces_use_their_implementation_factory() {
    let instantiator =
        ManifestInstantiator::new(manifest()).register("mirror.example.ServerImpl", || ServerImpl);

    let obj = instantiator.instantiate("org.example.Server").unwrap();

    assert_eq!(obj.class(), "org.example.Server");
    assert_eq!(obj.downcast_ref::<ServerImpl>(), Some(&ServerImpl));
}

#[test]
fn unregistered_mirrors_become_placeholders() {
    let instantiator = ManifestInstantiator::new(manifest());

    let obj = instantiator.instantiate("org.example.World").unwrap();

    assert_eq!(
        obj.downcast_ref::<Placeholder>(),
        Some(&Placeholder {
            class: "org.example.World".into(),
            mirror: Some("mirror.example.World".into()),
        })
    );
}

#[test]
fn unmapped_types_are_rejected() {
    let instantiator = ManifestInstantiator::new(manifest());

    let err = instantiator.instantiate("org.other.Thing").unwrap_err();

    assert_eq!(err, InstantiateError::UnknownType("org.other.Thing".into()));
    assert_eq!(err.to_string(), "no mirror type known for `org.other.Thing`");
}

#[test]
fn closures_are_instantiators() {
    let instantiator = |class: &str| -> Result<ObjectRef, InstantiateError> {
        Ok(ObjectRef::new(class, class.len()))
    };

    let obj = instantiator.instantiate("pkg.Widget").unwrap();

    assert_eq!(obj.downcast_ref::<usize>(), Some(&10));
}
