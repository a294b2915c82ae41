//! Descriptor graph of the original API.
//!
//! Built once from a [`Catalog`](crate::Catalog) and treated as immutable
//! input by every later phase.

use serde::{Deserialize, Serialize};

use crate::names::{package_of, simple_name};
use crate::types::TypeReference;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Interface,
    Class,
    Enum,
    Record,
    Annotation,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    /// Visible to code outside the declaring package.
    pub fn is_exported(self) -> bool {
        matches!(self, Self::Public | Self::Protected)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    /// Whether the annotation type itself is public.
    pub public: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeReference>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeReference,
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub params: Vec<Parameter>,
    pub returns: TypeReference,
    pub type_params: Vec<TypeParam>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_default: bool,
    pub varargs: bool,
    pub bridge: bool,
    pub synthetic: bool,
    pub annotations: Vec<Annotation>,
}

impl Method {
    /// Same member: equal names and parameter lists equal after erasure.
    ///
    /// Return types do not take part.
    pub fn same_member(&self, other: &Method) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.ty.erasure() == b.ty.erasure())
    }

    /// Erased parameter list, e.g. `wait(long, int)`.
    pub fn erased_signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| p.ty.erasure().to_string())
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }

    pub fn type_param_names(&self) -> Vec<&str> {
        self.type_params.iter().map(|p| p.name.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeReference,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub synthetic: bool,
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    pub params: Vec<Parameter>,
    pub visibility: Visibility,
    pub varargs: bool,
    pub synthetic: bool,
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordComponent {
    pub name: String,
    pub ty: TypeReference,
}

/// A member of any kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Member {
    Method(Method),
    Field(Field),
    Constructor(Constructor),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Self::Method(m) => &m.name,
            Self::Field(f) => &f.name,
            Self::Constructor(_) => "<init>",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Binary name, nested types joined with `$`.
    pub name: String,
    pub kind: TypeKind,
    pub visibility: Visibility,
    pub synthetic: bool,
    pub anonymous: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub enclosing: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<TypeReference>,
    pub interfaces: Vec<TypeReference>,
    pub annotations: Vec<Annotation>,
    pub constructors: Vec<Constructor>,
    pub methods: Vec<Method>,
    pub fields: Vec<Field>,
    pub enum_constants: Vec<String>,
    pub record_components: Vec<RecordComponent>,
}

impl TypeDescriptor {
    pub fn package(&self) -> &str {
        package_of(&self.name)
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn is_nested(&self) -> bool {
        self.enclosing.is_some()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Superclass followed by the directly implemented interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeReference> {
        self.superclass.iter().chain(&self.interfaces)
    }

    /// Nesting depth: 0 for top-level types.
    pub fn depth(&self) -> usize {
        self.name.matches('$').count()
    }

    pub fn type_param_names(&self) -> Vec<&str> {
        self.type_params.iter().map(|p| p.name.as_str()).collect()
    }
}
