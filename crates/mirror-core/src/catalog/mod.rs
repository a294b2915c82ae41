//! API catalog: the descriptor graph of an original API.
//!
//! Catalogs are authored as JSON (see [`Catalog::from_json`]) and can be
//! packed into a compact postcard form with [`Catalog::to_binary`].

mod binary;
mod json;


use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;

pub use json::CatalogError;

/// Types of an original API keyed by binary name, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    types: IndexMap<String, TypeDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type. Binary names must be unique.
    pub fn insert(&mut self, ty: TypeDescriptor) -> Result<(), CatalogError> {
        if self.types.contains_key(&ty.name) {
            return Err(CatalogError::DuplicateType(ty.name));
        }
        self.types.insert(ty.name.clone(), ty);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Types whose directly enclosing type is `name`.
    pub fn nested_in<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TypeDescriptor> {
        self.types
            .values()
            .filter(move |t| t.enclosing.as_deref() == Some(name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load either representation, sniffing JSON by its leading `{`.
    pub fn load(bytes: &[u8]) -> Result<Self, CatalogError> {
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        if first == Some(&b'{') {
            let text = std::str::from_utf8(bytes).map_err(|_| CatalogError::NotUtf8)?;
            Self::from_json(text)
        } else {
            Self::from_binary(bytes)
        }
    }
}

impl FromIterator<TypeDescriptor> for Catalog {
    /// Later duplicates replace earlier ones.
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }
}
