//! Descriptor-level definitions of generated types.
//!
//! The emitter decides *what* a mirror looks like; the renderer only decides
//! how it is spelled.

use mirror_core::TypeReference;

use crate::naming::MirrorName;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefinitionKind {
    Interface,
    Class,
    Enum,
    Record,
    Annotation,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub access: Access,
    pub is_abstract: bool,
    pub is_default: bool,
    pub is_static: bool,
    pub is_final: bool,
}

impl Modifiers {
    pub fn with_access(access: Access) -> Self {
        Self {
            access,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeParamDef {
    pub name: String,
    pub bounds: Vec<TypeReference>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamDef {
    pub name: String,
    pub ty: TypeReference,
    pub annotations: Vec<String>,
    /// Rendered as `Element... name`; only valid on the last parameter.
    pub varargs: bool,
}

/// Which bridge entry point a generated body forwards to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Instance,
    Static,
}

/// A call forwarded to the remote side.
#[derive(Clone, Debug, PartialEq)]
pub struct Forward {
    pub dispatch: Dispatch,
    /// Member name on the remote type.
    pub member: String,
    /// Original binary name of the declaring type.
    pub owner: String,
    pub args: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamDef>,
    pub params: Vec<ParamDef>,
    pub returns: TypeReference,
    pub annotations: Vec<String>,
    /// `None` for abstract members.
    pub body: Option<Forward>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub modifiers: Modifiers,
    pub ty: TypeReference,
    pub annotations: Vec<String>,
    /// Original binary name of the declaring type.
    pub owner: String,
}

/// Argument passed to a superclass constructor.
#[derive(Clone, Debug, PartialEq)]
pub enum SuperArg {
    /// Default literal of a primitive, e.g. `0L`.
    Literal(&'static str),
    /// Bridge placeholder instance of the erased type, cast to `ty`.
    Placeholder {
        ty: TypeReference,
        erased: TypeReference,
    },
    /// Empty array of the erased type, cast to `ty`.
    EmptyArray {
        ty: TypeReference,
        erased: TypeReference,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConstructorBody {
    /// Register the new instance with the remote side.
    ///
    /// A guarded body only runs when the instance is exactly of the
    /// enclosing type, leaving registration to the subclass constructor.
    TrackNew {
        owner: String,
        args: Vec<String>,
        guarded: bool,
    },
    /// Bind an enum instance to the remote constant of the same name.
    BindConstant { owner: String },
    Empty,
}

/// Instance field fetched once the instance is known to the remote side.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInit {
    pub name: String,
    /// Original binary name of the declaring type.
    pub owner: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstructorDef {
    pub modifiers: Modifiers,
    pub params: Vec<ParamDef>,
    pub annotations: Vec<String>,
    pub super_args: Option<Vec<SuperArg>>,
    /// Compact canonical record constructor.
    pub compact: bool,
    pub body: ConstructorBody,
    /// Runs after `body`, inside the same guard.
    pub fields: Vec<FieldInit>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeDefinition {
    pub kind: DefinitionKind,
    pub name: MirrorName,
    /// Original binary name this definition mirrors.
    pub original: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamDef>,
    pub superclass: Option<TypeReference>,
    pub interfaces: Vec<TypeReference>,
    pub annotations: Vec<String>,
    pub constants: Vec<String>,
    pub components: Vec<ParamDef>,
    pub fields: Vec<FieldDef>,
    pub constructors: Vec<ConstructorDef>,
    pub methods: Vec<MethodDef>,
    /// Member types, emitted inside this one.
    pub members: Vec<TypeDefinition>,
}

impl TypeDefinition {
    pub fn new(kind: DefinitionKind, name: MirrorName, original: impl Into<String>) -> Self {
        Self {
            kind,
            name,
            original: original.into(),
            modifiers: Modifiers::default(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            constants: Vec::new(),
            components: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn member(&self, simple: &str) -> Option<&TypeDefinition> {
        self.members.iter().find(|m| m.name.simple() == simple)
    }
}
