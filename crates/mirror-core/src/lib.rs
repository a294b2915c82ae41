#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for API mirrors.
//!
//! Two layers:
//! - **Deserialization layer**: the JSON catalog format, private to [`catalog`]
//! - **Descriptor layer**: [`TypeDescriptor`] and friends, consumed read-only
//!   by the generator
//!
//! The [`Manifest`] is the one artifact shared between generation time and
//! run time.

pub mod catalog;
pub mod descriptor;
pub mod manifest;
pub mod names;
pub mod types;


pub use catalog::{Catalog, CatalogError};
pub use descriptor::{
    Annotation, Constructor, Field, Member, Method, Parameter, RecordComponent, TypeDescriptor,
    TypeKind, TypeParam, Visibility,
};
pub use manifest::Manifest;
pub use types::{Bindings, TypeReference, Wildcard};
