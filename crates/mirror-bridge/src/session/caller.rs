use std::io::Read;

use super::{ChannelConfig, Transport, apply};
use crate::codec::{self, WireValue};
use crate::instantiate::Instantiator;
use crate::protocol::frame::{self, Frame};
use crate::protocol::{FieldFetch, MethodCall, NewObject, Opcode, Packet};
use crate::registry::{Handle, ObjectRegistry, Role};
use crate::value::{ObjectRef, Value};
use crate::{BridgeError, PROTOCOL_VERSION, Result};

/// The side that owns proxies and forwards calls on them.
///
/// Each request blocks until its response arrives; `&mut self` keeps one
/// call in flight at a time. A call that fails on the stream itself leaves
/// the caller broken: every later request fails with `Closed`.
pub struct Caller<S> {
    stream: S,
    registry: ObjectRegistry,
    instantiator: Box<dyn Instantiator + Send>,
    broken: bool,
}

impl<S: Transport> Caller<S> {
    /// Apply `config` to `stream` and verify the executor's version byte.
    pub fn connect(
        mut stream: S,
        config: &ChannelConfig,
        instantiator: impl Instantiator + Send + 'static,
    ) -> Result<Self> {
        apply(&stream, config)?;

        let mut version = [0_u8; 1];
        stream.read_exact(&mut version)?;
        if version[0] != PROTOCOL_VERSION {
            return Err(BridgeError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                received: version[0],
            });
        }
        tracing::debug!(version = version[0], "connected to executor");

        Ok(Self {
            stream,
            registry: ObjectRegistry::new(Role::Caller),
            instantiator: Box::new(instantiator),
            broken: false,
        })
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Whether an earlier call lost its response and the stream is unusable.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Invoke an instance method of `owner` on `target`.
    pub fn call(
        &mut self,
        target: &ObjectRef,
        owner: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value> {
        self.round_trip(Packet::MethodCall(MethodCall {
            method: method.to_string(),
            owner: owner.to_string(),
            object: Some(target.clone()),
            parameters: args,
        }))
    }

    pub fn call_static(&mut self, owner: &str, method: &str, args: Vec<Value>) -> Result<Value> {
        self.round_trip(Packet::MethodCall(MethodCall {
            method: method.to_string(),
            owner: owner.to_string(),
            object: None,
            parameters: args,
        }))
    }

    pub fn fetch_field(&mut self, target: &ObjectRef, owner: &str, field: &str) -> Result<Value> {
        self.round_trip(Packet::FieldFetch(FieldFetch {
            class_name: owner.to_string(),
            field: field.to_string(),
            owner: Some(Value::Object(target.clone())),
        }))
    }

    pub fn fetch_static_field(&mut self, owner: &str, field: &str) -> Result<Value> {
        self.round_trip(Packet::FieldFetch(FieldFetch {
            class_name: owner.to_string(),
            field: field.to_string(),
            owner: None,
        }))
    }

    /// Construct the real `class` remotely and pair it with the local `proxy`.
    pub fn track_new(&mut self, proxy: &ObjectRef, class: &str, args: Vec<Value>) -> Result<Handle> {
        let fresh = self.registry.handle_of(proxy).is_none();
        let id = self.registry.reserve(proxy).map_err(codec::CodecError::from)?;
        let ack = self
            .round_trip(Packet::NewObject(NewObject {
                id,
                class_name: class.to_string(),
                parameters: args,
            }))
            .inspect_err(|_| {
                if fresh {
                    self.registry.release(id);
                }
            })?;
        if !ack.is_null() {
            tracing::warn!(%id, class, "non-null acknowledgement for new object");
        }
        Ok(id)
    }

    /// Bind the local `proxy` to the object held in a static field, such as
    /// an enum constant.
    pub fn bind_static_field(&mut self, proxy: &ObjectRef, owner: &str, field: &str) -> Result<Handle> {
        let request = Packet::FieldFetch(FieldFetch {
            class_name: owner.to_string(),
            field: field.to_string(),
            owner: None,
        });
        let response = self.exchange(&request)?;

        let wire: WireValue =
            serde_json::from_str(&response.payload).map_err(codec::CodecError::from)?;
        let WireValue::Marked { object_id, .. } = wire else {
            return Err(BridgeError::UnexpectedValue(format!(
                "{owner}.{field} is not an object"
            )));
        };
        self.registry
            .insert(object_id, proxy.clone())
            .map_err(codec::CodecError::from)?;
        Ok(object_id)
    }

    /// Send the request and decode the paired `MethodReturn`.
    fn round_trip(&mut self, request: Packet) -> Result<Value> {
        let response = self.exchange(&request)?;
        match Packet::decode(&response, &mut self.registry, &*self.instantiator)? {
            Packet::MethodReturn(value) => Ok(value),
            other => Err(BridgeError::UnexpectedPacket {
                expected: Opcode::MethodReturn,
                received: other.opcode(),
            }),
        }
    }

    fn exchange(&mut self, request: &Packet) -> Result<Frame> {
        if self.broken {
            return Err(BridgeError::Closed);
        }
        let outgoing = request.encode(&mut self.registry)?;

        let response = self.transfer(&outgoing);
        if let Err(err) = &response {
            tracing::debug!(error = %err, "channel unusable after failed call");
            self.broken = true;
        }
        response
    }

    /// Write `outgoing` and read the frame answering it. Any failure here
    /// leaves the request without a known response.
    fn transfer(&mut self, outgoing: &Frame) -> Result<Frame> {
        tracing::trace!(opcode = %outgoing.opcode, len = outgoing.payload.len(), "send");
        frame::write_frame(&mut self.stream, outgoing)?;

        let response = frame::read_frame(&mut self.stream)?.ok_or(BridgeError::Closed)?;
        tracing::trace!(opcode = %response.opcode, len = response.payload.len(), "recv");
        if response.opcode.is_request() {
            return Err(BridgeError::UnexpectedPacket {
                expected: Opcode::MethodReturn,
                received: response.opcode,
            });
        }
        Ok(response)
    }

    /// Tear the session down, forgetting every handle.
    pub fn close(mut self) -> S {
        if !self.registry.is_empty() {
            tracing::debug!(handles = self.registry.len(), "clearing registry");
        }
        self.registry.clear();
        self.stream
    }
}
