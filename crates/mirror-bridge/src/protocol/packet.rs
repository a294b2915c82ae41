//! The four call kinds and their JSON bodies.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::frame::{self, Frame};
use super::Opcode;
use crate::codec::{self, CodecError, CodecResult, WireValue};
use crate::instantiate::Instantiator;
use crate::registry::{Handle, ObjectRegistry};
use crate::value::{ObjectRef, Value};

/// Read a field of a class, or of `owner` when given.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFetch {
    pub class_name: String,
    pub field: String,
    pub owner: Option<Value>,
}

/// Invoke `method` declared by `owner`, on `object` unless static.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub owner: String,
    pub object: Option<ObjectRef>,
    pub parameters: Vec<Value>,
}

/// Construct `class_name` on the executor and bind it to `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewObject {
    pub id: Handle,
    pub class_name: String,
    pub parameters: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    FieldFetch(FieldFetch),
    MethodCall(MethodCall),
    MethodReturn(Value),
    NewObject(NewObject),
}

#[derive(Serialize, Deserialize)]
struct RawFieldFetch {
    class: String,
    field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<WireValue>,
}

#[derive(Serialize, Deserialize)]
struct RawMethodCall {
    method: String,
    owner: String,
    #[serde(rename = "objectId", default, skip_serializing_if = "Option::is_none")]
    object_id: Option<Handle>,
    #[serde(default)]
    parameters: Vec<WireValue>,
}

#[derive(Serialize, Deserialize)]
struct RawNewObject {
    id: Handle,
    class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<WireValue>,
}

impl Packet {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::FieldFetch(_) => Opcode::FieldFetch,
            Self::MethodCall(_) => Opcode::MethodCall,
            Self::MethodReturn(_) => Opcode::MethodReturn,
            Self::NewObject(_) => Opcode::NewObject,
        }
    }

    /// Serialize into a frame, reserving handles for unregistered objects.
    pub fn encode(&self, registry: &mut ObjectRegistry) -> CodecResult<Frame> {
        let payload = match self {
            Self::FieldFetch(p) => serde_json::to_string(&RawFieldFetch {
                class: p.class_name.clone(),
                field: p.field.clone(),
                owner: p
                    .owner
                    .as_ref()
                    .map(|v| codec::encode_value(v, registry))
                    .transpose()?,
            })?,
            Self::MethodCall(p) => serde_json::to_string(&RawMethodCall {
                method: p.method.clone(),
                owner: p.owner.clone(),
                object_id: p.object.as_ref().map(|o| registry.reserve(o)).transpose()?,
                parameters: codec::encode_all(&p.parameters, registry)?,
            })?,
            Self::MethodReturn(v) => serde_json::to_string(&codec::encode_value(v, registry)?)?,
            Self::NewObject(p) => serde_json::to_string(&RawNewObject {
                id: p.id,
                class: p.class_name.clone(),
                parameters: codec::encode_all(&p.parameters, registry)?,
            })?,
        };
        Ok(Frame::new(self.opcode(), payload))
    }

    /// Parse a frame, resolving handles through `registry`.
    pub fn decode(
        frame: &Frame,
        registry: &mut ObjectRegistry,
        instantiator: &dyn Instantiator,
    ) -> CodecResult<Self> {
        let body = frame.payload.as_str();
        Ok(match frame.opcode {
            Opcode::FieldFetch => {
                let raw: RawFieldFetch = serde_json::from_str(body)?;
                Self::FieldFetch(FieldFetch {
                    class_name: raw.class,
                    field: raw.field,
                    owner: raw
                        .owner
                        .map(|w| codec::decode_value(w, registry, instantiator))
                        .transpose()?,
                })
            }
            Opcode::MethodCall => {
                let raw: RawMethodCall = serde_json::from_str(body)?;
                let object = match raw.object_id {
                    Some(handle) => Some(
                        registry
                            .get(handle)
                            .cloned()
                            .ok_or(CodecError::ObjectNotFound(handle))?,
                    ),
                    None => None,
                };
                Self::MethodCall(MethodCall {
                    method: raw.method,
                    owner: raw.owner,
                    object,
                    parameters: codec::decode_all(raw.parameters, registry, instantiator)?,
                })
            }
            Opcode::MethodReturn => {
                let raw: WireValue = serde_json::from_str(body)?;
                Self::MethodReturn(codec::decode_value(raw, registry, instantiator)?)
            }
            Opcode::NewObject => {
                let raw: RawNewObject = serde_json::from_str(body)?;
                Self::NewObject(NewObject {
                    id: raw.id,
                    class_name: raw.class,
                    parameters: codec::decode_all(raw.parameters, registry, instantiator)?,
                })
            }
        })
    }

    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        registry: &mut ObjectRegistry,
    ) -> Result<(), PacketError> {
        let outgoing = self.encode(registry)?;
        tracing::trace!(opcode = %outgoing.opcode, len = outgoing.payload.len(), "send");
        frame::write_frame(writer, &outgoing)?;
        Ok(())
    }

    /// `Ok(None)` when the peer closed the stream between packets.
    pub fn read_from<R: Read>(
        reader: &mut R,
        registry: &mut ObjectRegistry,
        instantiator: &dyn Instantiator,
    ) -> Result<Option<Self>, PacketError> {
        let Some(incoming) = frame::read_frame(reader)? else {
            return Ok(None);
        };
        tracing::trace!(opcode = %incoming.opcode, len = incoming.payload.len(), "recv");
        Ok(Some(Self::decode(&incoming, registry, instantiator)?))
    }
}

/// Framing or codec failure while moving one packet.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    #[error(transparent)]
    Frame(#[from] frame::FrameError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<FieldFetch> for Packet {
    fn from(p: FieldFetch) -> Self {
        Self::FieldFetch(p)
    }
}

impl From<MethodCall> for Packet {
    fn from(p: MethodCall) -> Self {
        Self::MethodCall(p)
    }
}

impl From<NewObject> for Packet {
    fn from(p: NewObject) -> Self {
        Self::NewObject(p)
    }
}
