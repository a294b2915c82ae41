//! JSON deserialization for API catalogs.
//!
//! Type references are internally tagged by a `kind` field; everything else
//! maps 1:1 onto the descriptor structs with lenient defaults.

use serde::Deserialize;

use super::Catalog;
use crate::descriptor::{
    Annotation, Constructor, Field, Method, Parameter, RecordComponent, TypeDescriptor, TypeKind,
    TypeParam, Visibility,
};
use crate::types::{TypeReference, Wildcard};

/// Error during catalog loading.
#[derive(Debug)]
pub enum CatalogError {
    Json(serde_json::Error),
    Binary(postcard::Error),
    NotUtf8,
    DuplicateType(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Binary(e) => write!(f, "binary decode error: {e}"),
            Self::NotUtf8 => write!(f, "catalog is neither UTF-8 JSON nor binary"),
            Self::DuplicateType(name) => write!(f, "type `{name}` is declared twice"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Binary(e) => Some(e),
            Self::NotUtf8 | Self::DuplicateType(_) => None,
        }
    }
}

impl Catalog {
    /// Parse catalog from JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json).map_err(CatalogError::Json)?;
        let mut catalog = Catalog::new();
        for ty in raw.types {
            catalog.insert(ty.into())?;
        }
        Ok(catalog)
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    Interface,
    Class,
    Enum,
    Record,
    Annotation,
}

impl From<RawKind> for TypeKind {
    fn from(raw: RawKind) -> Self {
        match raw {
            RawKind::Interface => TypeKind::Interface,
            RawKind::Class => TypeKind::Class,
            RawKind::Enum => TypeKind::Enum,
            RawKind::Record => TypeKind::Record,
            RawKind::Annotation => TypeKind::Annotation,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawVisibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl From<RawVisibility> for Visibility {
    fn from(raw: RawVisibility) -> Self {
        match raw {
            RawVisibility::Public => Visibility::Public,
            RawVisibility::Protected => Visibility::Protected,
            RawVisibility::Package => Visibility::Package,
            RawVisibility::Private => Visibility::Private,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawType {
    name: String,
    kind: RawKind,
    #[serde(default)]
    visibility: RawVisibility,
    #[serde(default)]
    synthetic: bool,
    #[serde(default)]
    anonymous: bool,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    #[serde(default, rename = "final")]
    is_final: bool,
    #[serde(default)]
    enclosing: Option<String>,
    #[serde(default)]
    type_params: Vec<RawTypeParam>,
    #[serde(default)]
    superclass: Option<RawTypeRef>,
    #[serde(default)]
    interfaces: Vec<RawTypeRef>,
    #[serde(default)]
    annotations: Vec<RawAnnotation>,
    #[serde(default)]
    constructors: Vec<RawConstructor>,
    #[serde(default)]
    methods: Vec<RawMethod>,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    enum_constants: Vec<String>,
    #[serde(default)]
    record_components: Vec<RawRecordComponent>,
}

impl From<RawType> for TypeDescriptor {
    fn from(raw: RawType) -> Self {
        Self {
            name: raw.name,
            kind: raw.kind.into(),
            visibility: raw.visibility.into(),
            synthetic: raw.synthetic,
            anonymous: raw.anonymous,
            is_abstract: raw.is_abstract,
            is_final: raw.is_final,
            enclosing: raw.enclosing,
            type_params: raw.type_params.into_iter().map(Into::into).collect(),
            superclass: raw.superclass.map(Into::into),
            interfaces: raw.interfaces.into_iter().map(Into::into).collect(),
            annotations: raw.annotations.into_iter().map(Into::into).collect(),
            constructors: raw.constructors.into_iter().map(Into::into).collect(),
            methods: raw.methods.into_iter().map(Into::into).collect(),
            fields: raw.fields.into_iter().map(Into::into).collect(),
            enum_constants: raw.enum_constants,
            record_components: raw.record_components.into_iter().map(Into::into).collect(),
        }
    }
}

/// Type reference, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawTypeRef {
    Class {
        name: String,
    },
    Parameterized {
        raw: String,
        #[serde(default)]
        args: Vec<RawTypeRef>,
    },
    Wildcard {
        #[serde(default)]
        upper: Option<Box<RawTypeRef>>,
        #[serde(default)]
        lower: Option<Box<RawTypeRef>>,
    },
    Var {
        name: String,
        #[serde(default)]
        bounds: Vec<RawTypeRef>,
    },
    Array {
        element: Box<RawTypeRef>,
    },
}

impl From<RawTypeRef> for TypeReference {
    fn from(raw: RawTypeRef) -> Self {
        match raw {
            RawTypeRef::Class { name } => TypeReference::Concrete(name),
            RawTypeRef::Parameterized { raw, args } => TypeReference::Parameterized {
                raw,
                args: args.into_iter().map(Into::into).collect(),
            },
            RawTypeRef::Wildcard { upper, lower } => TypeReference::Wildcard(match (upper, lower) {
                (_, Some(lower)) => Wildcard::Super(Box::new((*lower).into())),
                (Some(upper), None) => Wildcard::Extends(Box::new((*upper).into())),
                (None, None) => Wildcard::Unbounded,
            }),
            RawTypeRef::Var { name, bounds } => TypeReference::Variable {
                name,
                bounds: bounds.into_iter().map(Into::into).collect(),
            },
            RawTypeRef::Array { element } => TypeReference::Array(Box::new((*element).into())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTypeParam {
    name: String,
    #[serde(default)]
    bounds: Vec<RawTypeRef>,
}

impl From<RawTypeParam> for TypeParam {
    fn from(raw: RawTypeParam) -> Self {
        Self {
            name: raw.name,
            bounds: raw.bounds.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAnnotation {
    name: String,
    #[serde(default = "default_true")]
    public: bool,
}

fn default_true() -> bool {
    true
}

impl From<RawAnnotation> for Annotation {
    fn from(raw: RawAnnotation) -> Self {
        Self {
            name: raw.name,
            public: raw.public,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    name: String,
    #[serde(rename = "type")]
    ty: RawTypeRef,
    #[serde(default)]
    annotations: Vec<RawAnnotation>,
}

impl From<RawParameter> for Parameter {
    fn from(raw: RawParameter) -> Self {
        Self {
            name: raw.name,
            ty: raw.ty.into(),
            annotations: raw.annotations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMethod {
    name: String,
    #[serde(default)]
    params: Vec<RawParameter>,
    #[serde(default)]
    returns: Option<RawTypeRef>,
    #[serde(default)]
    type_params: Vec<RawTypeParam>,
    #[serde(default)]
    visibility: RawVisibility,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    #[serde(default, rename = "default")]
    is_default: bool,
    #[serde(default)]
    varargs: bool,
    #[serde(default)]
    bridge: bool,
    #[serde(default)]
    synthetic: bool,
    #[serde(default)]
    annotations: Vec<RawAnnotation>,
}

impl From<RawMethod> for Method {
    fn from(raw: RawMethod) -> Self {
        Self {
            name: raw.name,
            params: raw.params.into_iter().map(Into::into).collect(),
            // A missing return type means `void`.
            returns: raw.returns.map_or_else(TypeReference::void, Into::into),
            type_params: raw.type_params.into_iter().map(Into::into).collect(),
            visibility: raw.visibility.into(),
            is_static: raw.is_static,
            is_abstract: raw.is_abstract,
            is_default: raw.is_default,
            varargs: raw.varargs,
            bridge: raw.bridge,
            synthetic: raw.synthetic,
            annotations: raw.annotations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    ty: RawTypeRef,
    #[serde(default)]
    visibility: RawVisibility,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default, rename = "final")]
    is_final: bool,
    #[serde(default)]
    synthetic: bool,
    #[serde(default)]
    annotations: Vec<RawAnnotation>,
}

impl From<RawField> for Field {
    fn from(raw: RawField) -> Self {
        Self {
            name: raw.name,
            ty: raw.ty.into(),
            visibility: raw.visibility.into(),
            is_static: raw.is_static,
            is_final: raw.is_final,
            synthetic: raw.synthetic,
            annotations: raw.annotations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConstructor {
    #[serde(default)]
    params: Vec<RawParameter>,
    #[serde(default)]
    visibility: RawVisibility,
    #[serde(default)]
    varargs: bool,
    #[serde(default)]
    synthetic: bool,
    #[serde(default)]
    annotations: Vec<RawAnnotation>,
}

impl From<RawConstructor> for Constructor {
    fn from(raw: RawConstructor) -> Self {
        Self {
            params: raw.params.into_iter().map(Into::into).collect(),
            visibility: raw.visibility.into(),
            varargs: raw.varargs,
            synthetic: raw.synthetic,
            annotations: raw.annotations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecordComponent {
    name: String,
    #[serde(rename = "type")]
    ty: RawTypeRef,
}

impl From<RawRecordComponent> for RecordComponent {
    fn from(raw: RawRecordComponent) -> Self {
        Self {
            name: raw.name,
            ty: raw.ty.into(),
        }
    }
}
