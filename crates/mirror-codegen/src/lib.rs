#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Mirror generation for an API catalog.
//!
//! Pipeline:
//! 1. [`scan`](scan::scan) picks the types under the configured prefixes
//! 2. [`NameMapping`] assigns every one a collision-free mirror name
//! 3. [`MemberSelector`](members::MemberSelector) and
//!    [`SubstitutionMap`](generics::SubstitutionMap) decide what each mirror
//!    declares
//! 4. [`Emitter`](emit::Emitter) builds definitions, which are rendered as
//!    Java source
//!
//! [`Generator`] runs all of it.

use std::io;
use std::path::PathBuf;

mod config;
pub mod emit;
mod generator;
pub mod generics;
pub mod members;
pub mod naming;
pub mod scan;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod scan_tests;
#[cfg(test)]
mod test_utils;

pub use config::{Config, PackageRoot};
pub use generator::{GeneratedFile, Generation, Generator};
pub use naming::{MirrorName, NameMapping};

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A signature references a mirrored package type that has no mapping.
    #[error("unresolved mirror mapping for type `{0}`")]
    UnresolvedType(String),

    #[error("no package prefix configured")]
    NoPackages,

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenError>;
