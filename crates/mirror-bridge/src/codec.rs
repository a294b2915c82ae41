//! Recursive value encoding against an [`ObjectRegistry`].

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::instantiate::{InstantiateError, Instantiator};
use crate::registry::{Handle, ObjectRegistry, RegistryError};
use crate::value::{CollectionKind, PrimitiveTag, Value};

/// JSON shape of a [`Value`] on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireValue {
    /// An object named by handle rather than by contents.
    Marked {
        #[serde(rename = "objectId")]
        object_id: Handle,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class_type: Option<String>,
    },
    Array {
        elements: Vec<WireValue>,
    },
    Collection {
        elements: Vec<WireValue>,
        class_type: String,
    },
    Primitive {
        value: serde_json::Value,
        class_type: String,
    },
    Null,
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("cannot encode {0}")]
    UnsupportedValue(String),

    #[error("object not found for handle {0}")]
    ObjectNotFound(Handle),

    #[error("unknown primitive type `{0}`")]
    UnknownPrimitive(String),

    #[error("unknown collection type `{0}`")]
    UnknownCollection(String),

    #[error("invalid `{class}` literal {literal}")]
    InvalidLiteral {
        class: String,
        literal: serde_json::Value,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Instantiate(#[from] InstantiateError),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Encode `value`, registering objects seen for the first time.
pub fn encode_value(value: &Value, registry: &mut ObjectRegistry) -> CodecResult<WireValue> {
    let primitive = |value: serde_json::Value, tag: PrimitiveTag| WireValue::Primitive {
        value,
        class_type: tag.class_name().to_string(),
    };

    Ok(match value {
        Value::Null => WireValue::Null,
        Value::Object(obj) => WireValue::Marked {
            object_id: registry.reserve(obj)?,
            class_type: Some(obj.class().to_string()),
        },
        Value::Array(items) => WireValue::Array {
            elements: encode_all(items, registry)?,
        },
        Value::Collection(kind, items) => WireValue::Collection {
            elements: encode_all(items, registry)?,
            class_type: kind.class_name().to_string(),
        },
        Value::Bool(v) => primitive((*v).into(), PrimitiveTag::Boolean),
        Value::Byte(v) => primitive((*v).into(), PrimitiveTag::Byte),
        Value::Short(v) => primitive((*v).into(), PrimitiveTag::Short),
        Value::Int(v) => primitive((*v).into(), PrimitiveTag::Integer),
        Value::Long(v) => primitive((*v).into(), PrimitiveTag::Long),
        Value::Float(v) => primitive(finite(f64::from(*v), "float")?, PrimitiveTag::Float),
        Value::Double(v) => primitive(finite(*v, "double")?, PrimitiveTag::Double),
        Value::Char(c) => primitive(c.to_string().into(), PrimitiveTag::Character),
        Value::String(s) => primitive(s.as_str().into(), PrimitiveTag::String),
    })
}

pub fn encode_all(values: &[Value], registry: &mut ObjectRegistry) -> CodecResult<Vec<WireValue>> {
    values.iter().map(|v| encode_value(v, registry)).collect()
}

fn finite(v: f64, kind: &str) -> CodecResult<serde_json::Value> {
    Number::from_f64(v)
        .map(serde_json::Value::Number)
        .ok_or_else(|| CodecError::UnsupportedValue(format!("non-finite {kind} {v}")))
}

/// Decode `wire`, instantiating and registering objects behind unknown handles.
pub fn decode_value(
    wire: WireValue,
    registry: &mut ObjectRegistry,
    instantiator: &dyn Instantiator,
) -> CodecResult<Value> {
    match wire {
        WireValue::Null => Ok(Value::Null),
        WireValue::Marked {
            object_id,
            class_type,
        } => {
            if let Some(obj) = registry.get(object_id) {
                return Ok(Value::Object(obj.clone()));
            }
            let class = class_type.ok_or(CodecError::ObjectNotFound(object_id))?;
            let obj = instantiator.instantiate(&class)?;
            tracing::debug!(handle = %object_id, class = %class, "instantiated placeholder");
            registry.insert(object_id, obj.clone())?;
            Ok(Value::Object(obj))
        }
        WireValue::Array { elements } => {
            Ok(Value::Array(decode_all(elements, registry, instantiator)?))
        }
        WireValue::Collection {
            elements,
            class_type,
        } => {
            let kind = CollectionKind::from_class_name(&class_type)
                .ok_or(CodecError::UnknownCollection(class_type))?;
            Ok(Value::Collection(
                kind,
                decode_all(elements, registry, instantiator)?,
            ))
        }
        WireValue::Primitive { value, class_type } => decode_primitive(value, class_type),
    }
}

pub fn decode_all(
    wires: Vec<WireValue>,
    registry: &mut ObjectRegistry,
    instantiator: &dyn Instantiator,
) -> CodecResult<Vec<Value>> {
    wires
        .into_iter()
        .map(|w| decode_value(w, registry, instantiator))
        .collect()
}

fn decode_primitive(literal: serde_json::Value, class: String) -> CodecResult<Value> {
    let tag = PrimitiveTag::from_class_name(&class)
        .ok_or_else(|| CodecError::UnknownPrimitive(class.clone()))?;

    let decoded = match tag {
        PrimitiveTag::Boolean => literal.as_bool().map(Value::Bool),
        PrimitiveTag::Byte => integer(&literal).map(Value::Byte),
        PrimitiveTag::Short => integer(&literal).map(Value::Short),
        PrimitiveTag::Integer => integer(&literal).map(Value::Int),
        PrimitiveTag::Long => literal.as_i64().map(Value::Long),
        PrimitiveTag::Float => literal.as_f64().map(|v| Value::Float(v as f32)),
        PrimitiveTag::Double => literal.as_f64().map(Value::Double),
        PrimitiveTag::Character => literal.as_str().and_then(single_char).map(Value::Char),
        PrimitiveTag::String => literal.as_str().map(|s| Value::String(s.to_string())),
    };
    decoded.ok_or(CodecError::InvalidLiteral { class, literal })
}

fn integer<T: TryFrom<i64>>(literal: &serde_json::Value) -> Option<T> {
    literal.as_i64().and_then(|v| T::try_from(v).ok())
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
