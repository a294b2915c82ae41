//! Name-mapping manifest shared by the generator and the runtime bridge.
//!
//! ```json
//! { "types": { "org.bukkit.Server": "mirror.bukkit.Server" },
//!   "implementations": { "org.bukkit.Server": "mirror.bukkit.ServerImpl" } }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Original binary name to mirror canonical name, plus interface
/// implementation names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub types: IndexMap<String, String>,
    #[serde(default)]
    pub implementations: IndexMap<String, String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn mirror_of(&self, original: &str) -> Option<&str> {
        self.types.get(original).map(String::as_str)
    }

    pub fn implementation_of(&self, original: &str) -> Option<&str> {
        self.implementations.get(original).map(String::as_str)
    }

    /// Concrete mirror to instantiate for a remote object of `original` type:
    /// the implementation for interfaces, the mirror itself otherwise.
    pub fn constructible(&self, original: &str) -> Option<&str> {
        self.implementation_of(original)
            .or_else(|| self.mirror_of(original))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
