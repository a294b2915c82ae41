//! Type references as they appear in signatures.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::names::{OBJECT, canonical};

/// Type-variable bindings: variable name to the type it stands for.
pub type Bindings = IndexMap<String, TypeReference>;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "float", "double", "char", "void",
];

/// A (possibly generic) type occurring in a signature.
///
/// Concrete names are JVM binary names; primitives and `void` use their
/// keyword as the name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeReference {
    Concrete(String),
    Parameterized {
        raw: String,
        args: Vec<TypeReference>,
    },
    Wildcard(Wildcard),
    Variable {
        name: String,
        bounds: Vec<TypeReference>,
    },
    Array(Box<TypeReference>),
}

/// Bound of a `?` type argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wildcard {
    Unbounded,
    Extends(Box<TypeReference>),
    Super(Box<TypeReference>),
}

impl TypeReference {
    pub fn concrete(name: impl Into<String>) -> Self {
        Self::Concrete(name.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn array(element: TypeReference) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn void() -> Self {
        Self::Concrete("void".to_string())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Concrete(name) if name == "void")
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Concrete(name) if PRIMITIVES.contains(&name.as_str()))
    }

    /// Name of the class this reference is rooted at, if any.
    ///
    /// Arrays, wildcards and variables have none.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Concrete(name) => Some(name),
            Self::Parameterized { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Replace free type variables with their bindings.
    ///
    /// Variables without a binding stay as they are.
    pub fn substitute(&self, bindings: &Bindings) -> TypeReference {
        self.substitute_shadowed(bindings, &[])
    }

    /// Like [`substitute`](Self::substitute), but leaves variables named in
    /// `shadowed` untouched (method-level type parameters hide class-level
    /// bindings of the same name).
    pub fn substitute_shadowed(&self, bindings: &Bindings, shadowed: &[&str]) -> TypeReference {
        match self {
            Self::Concrete(_) => self.clone(),
            Self::Parameterized { raw, args } => Self::Parameterized {
                raw: raw.clone(),
                args: args
                    .iter()
                    .map(|a| a.substitute_shadowed(bindings, shadowed))
                    .collect(),
            },
            Self::Wildcard(w) => Self::Wildcard(match w {
                Wildcard::Unbounded => Wildcard::Unbounded,
                Wildcard::Extends(t) => {
                    Wildcard::Extends(Box::new(t.substitute_shadowed(bindings, shadowed)))
                }
                Wildcard::Super(t) => {
                    Wildcard::Super(Box::new(t.substitute_shadowed(bindings, shadowed)))
                }
            }),
            Self::Variable { name, .. } => {
                if shadowed.contains(&name.as_str()) {
                    return self.clone();
                }
                match bindings.get(name) {
                    Some(bound) => bound.clone(),
                    None => self.clone(),
                }
            }
            Self::Array(element) => {
                Self::Array(Box::new(element.substitute_shadowed(bindings, shadowed)))
            }
        }
    }

    /// Erased form used for member identity: type arguments dropped, type
    /// variables and wildcards replaced by their first upper bound.
    pub fn erasure(&self) -> TypeReference {
        match self {
            Self::Concrete(_) => self.clone(),
            Self::Parameterized { raw, .. } => Self::Concrete(raw.clone()),
            Self::Wildcard(Wildcard::Extends(t)) => t.erasure(),
            Self::Wildcard(_) => Self::concrete(OBJECT),
            Self::Variable { bounds, .. } => match bounds.first() {
                Some(bound) => bound.erasure(),
                None => Self::concrete(OBJECT),
            },
            Self::Array(element) => Self::Array(Box::new(element.erasure())),
        }
    }

    /// Rewrite every class name, failing on the first name `rename` rejects.
    pub fn try_rename<E>(
        &self,
        rename: &mut impl FnMut(&str) -> Result<String, E>,
    ) -> Result<TypeReference, E> {
        Ok(match self {
            Self::Concrete(name) if self.is_primitive() => Self::Concrete(name.clone()),
            Self::Concrete(name) => Self::Concrete(rename(name)?),
            Self::Parameterized { raw, args } => Self::Parameterized {
                raw: rename(raw)?,
                args: args
                    .iter()
                    .map(|a| a.try_rename(rename))
                    .collect::<Result<_, _>>()?,
            },
            Self::Wildcard(w) => Self::Wildcard(match w {
                Wildcard::Unbounded => Wildcard::Unbounded,
                Wildcard::Extends(t) => Wildcard::Extends(Box::new(t.try_rename(rename)?)),
                Wildcard::Super(t) => Wildcard::Super(Box::new(t.try_rename(rename)?)),
            }),
            Self::Variable { name, bounds } => Self::Variable {
                name: name.clone(),
                bounds: bounds
                    .iter()
                    .map(|b| b.try_rename(rename))
                    .collect::<Result<_, _>>()?,
            },
            Self::Array(element) => Self::Array(Box::new(element.try_rename(rename)?)),
        })
    }

    /// Every class name mentioned anywhere in this reference.
    pub fn class_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_class_names(&mut out);
        out
    }

    fn collect_class_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Concrete(name) => {
                if !self.is_primitive() {
                    out.push(name);
                }
            }
            Self::Parameterized { raw, args } => {
                out.push(raw);
                for arg in args {
                    arg.collect_class_names(out);
                }
            }
            Self::Wildcard(Wildcard::Unbounded) => {}
            Self::Wildcard(Wildcard::Extends(t) | Wildcard::Super(t)) => {
                t.collect_class_names(out)
            }
            Self::Variable { bounds, .. } => {
                for bound in bounds {
                    bound.collect_class_names(out);
                }
            }
            Self::Array(element) => element.collect_class_names(out),
        }
    }
}

/// Renders Java source syntax. Variable bounds are not part of a use site.
impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(name) => f.write_str(&canonical(name)),
            Self::Parameterized { raw, args } => {
                write!(f, "{}<", canonical(raw))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Wildcard(Wildcard::Unbounded) => f.write_str("?"),
            Self::Wildcard(Wildcard::Extends(t)) => write!(f, "? extends {t}"),
            Self::Wildcard(Wildcard::Super(t)) => write!(f, "? super {t}"),
            Self::Variable { name, .. } => f.write_str(name),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}
