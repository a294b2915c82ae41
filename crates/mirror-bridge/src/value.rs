//! Runtime values crossing the channel.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a live object: the address of its shared allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Shared handle to a live object of some remote-visible class.
///
/// Equality and hashing follow identity, never contents.
#[derive(Clone)]
pub struct ObjectRef {
    class: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(class: &str, value: T) -> Self {
        Self::from_arc(class, Arc::new(value))
    }

    pub fn from_arc(class: &str, inner: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            class: Arc::from(class),
            inner,
        }
    }

    /// Binary name of the class the remote side knows this object as.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.inner) as *const () as usize)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.id() == other.id()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.class, self.id().0)
    }
}

/// Shape a collection is rebuilt as on the receiving side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Set,
}

impl CollectionKind {
    /// Class written on the wire.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::List => "java.util.ArrayList",
            Self::Set => "java.util.HashSet",
        }
    }

    /// Classify a received collection class by the interface it implements.
    pub fn from_class_name(name: &str) -> Option<Self> {
        const LISTS: &[&str] = &[
            "java.util.List",
            "java.util.ArrayList",
            "java.util.LinkedList",
            "java.util.Vector",
            "java.util.Stack",
            "java.util.Arrays$ArrayList",
            "java.util.concurrent.CopyOnWriteArrayList",
        ];
        const SETS: &[&str] = &[
            "java.util.Set",
            "java.util.HashSet",
            "java.util.LinkedHashSet",
            "java.util.TreeSet",
            "java.util.EnumSet",
            "java.util.concurrent.CopyOnWriteArraySet",
            "java.util.concurrent.ConcurrentSkipListSet",
        ];

        if LISTS.contains(&name) {
            return Some(Self::List);
        }
        if SETS.contains(&name) {
            return Some(Self::Set);
        }
        // Immutable and wrapper collections: `ImmutableCollections$ListN`,
        // `Collections$UnmodifiableSet`, ...
        let simple = name.rsplit(['.', '$']).next().unwrap_or(name);
        if name.starts_with("java.util.") {
            if simple.contains("List") {
                return Some(Self::List);
            }
            if simple.contains("Set") {
                return Some(Self::Set);
            }
        }
        None
    }
}

/// Wrapper class used on the wire for each primitive kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveTag {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Character,
    String,
}

impl PrimitiveTag {
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Boolean => "java.lang.Boolean",
            Self::Byte => "java.lang.Byte",
            Self::Short => "java.lang.Short",
            Self::Integer => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Float => "java.lang.Float",
            Self::Double => "java.lang.Double",
            Self::Character => "java.lang.Character",
            Self::String => "java.lang.String",
        }
    }

    pub fn from_class_name(name: &str) -> Option<Self> {
        Some(match name {
            "java.lang.Boolean" => Self::Boolean,
            "java.lang.Byte" => Self::Byte,
            "java.lang.Short" => Self::Short,
            "java.lang.Integer" => Self::Integer,
            "java.lang.Long" => Self::Long,
            "java.lang.Float" => Self::Float,
            "java.lang.Double" => Self::Double,
            "java.lang.Character" => Self::Character,
            "java.lang.String" => Self::String,
            _ => return None,
        })
    }
}

/// A value passed as an argument, result or field.
///
/// Composite values never contain cycles.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    Array(Vec<Value>),
    Collection(CollectionKind, Vec<Value>),
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(v.into()),
            Self::Short(v) => Some(v.into()),
            Self::Int(v) => Some(v.into()),
            Self::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
