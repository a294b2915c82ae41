//! Local stand-ins for objects first seen as a remote handle.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use mirror_core::Manifest;

use crate::value::ObjectRef;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstantiateError {
    #[error("no mirror type known for `{0}`")]
    UnknownType(String),

    #[error("cannot instantiate `{class}`: {reason}")]
    Failed { class: String, reason: String },
}

/// Builds a zero-argument local object for a remote class.
pub trait Instantiator {
    fn instantiate(&self, class: &str) -> Result<ObjectRef, InstantiateError>;
}

impl<F> Instantiator for F
where
    F: Fn(&str) -> Result<ObjectRef, InstantiateError>,
{
    fn instantiate(&self, class: &str) -> Result<ObjectRef, InstantiateError> {
        self(class)
    }
}

/// Opaque local object that only carries its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Binary name on the remote side.
    pub class: String,
    /// Mirror type standing in for it, when one is known.
    pub mirror: Option<String>,
}

/// Produces a [`Placeholder`] for any class.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderInstantiator;

impl Instantiator for PlaceholderInstantiator {
    fn instantiate(&self, class: &str) -> Result<ObjectRef, InstantiateError> {
        Ok(ObjectRef::new(
            class,
            Placeholder {
                class: class.to_string(),
                mirror: None,
            },
        ))
    }
}

type Factory = Box<dyn Fn() -> Arc<dyn Any + Send + Sync> + Send + Sync>;

/// Resolves remote classes through the generator's manifest.
///
/// Interfaces are instantiated as their implementation, other types as the
/// mirror itself. Mirrors without a registered factory become placeholders.
pub struct ManifestInstantiator {
    manifest: Manifest,
    factories: HashMap<String, Factory>,
}

impl ManifestInstantiator {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            factories: HashMap::new(),
        }
    }

    /// Register the zero-argument constructor of a mirror type.
    pub fn register<F, T>(mut self, mirror: &str, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.factories.insert(
            mirror.to_string(),
            Box::new(move || Arc::new(factory()) as Arc<dyn Any + Send + Sync>),
        );
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

impl Instantiator for ManifestInstantiator {
    fn instantiate(&self, class: &str) -> Result<ObjectRef, InstantiateError> {
        let mirror = self
            .manifest
            .constructible(class)
            .ok_or_else(|| InstantiateError::UnknownType(class.to_string()))?;

        let inner = match self.factories.get(mirror) {
            Some(factory) => factory(),
            None => Arc::new(Placeholder {
                class: class.to_string(),
                mirror: Some(mirror.to_string()),
            }),
        };
        Ok(ObjectRef::from_arc(class, inner))
    }
}

impl std::fmt::Debug for ManifestInstantiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestInstantiator")
            .field("types", &self.manifest.len())
            .field("factories", &self.factories.len())
            .finish()
    }
}
