use std::io::Write;

use super::{ChannelConfig, Transport, apply};
use crate::instantiate::{Instantiator, PlaceholderInstantiator};
use crate::protocol::{FieldFetch, MethodCall, NewObject, Opcode, Packet};
use crate::registry::{ObjectRegistry, Role};
use crate::value::{ObjectRef, Value};
use crate::{BridgeError, PROTOCOL_VERSION, Result};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvokeError(pub String);

impl InvokeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Performs requests against the real objects.
pub trait Invoker {
    fn invoke(&mut self, call: MethodCall) -> std::result::Result<Value, InvokeError>;

    fn fetch_field(&mut self, fetch: FieldFetch) -> std::result::Result<Value, InvokeError>;

    /// Build the object a caller-side proxy stands for.
    fn construct(&mut self, new: &NewObject) -> std::result::Result<ObjectRef, InvokeError>;
}

/// The side that owns the real objects and answers requests.
pub struct Executor<S, I> {
    stream: S,
    registry: ObjectRegistry,
    invoker: I,
    instantiator: Box<dyn Instantiator + Send>,
}

impl<S: Transport, I: Invoker> Executor<S, I> {
    /// Apply `config` and announce the protocol version.
    pub fn accept(mut stream: S, config: &ChannelConfig, invoker: I) -> Result<Self> {
        apply(&stream, config)?;
        stream.write_all(&[PROTOCOL_VERSION])?;
        stream.flush()?;
        tracing::debug!(version = PROTOCOL_VERSION, "accepted caller");

        Ok(Self {
            stream,
            registry: ObjectRegistry::new(Role::Executor),
            invoker,
            instantiator: Box::new(PlaceholderInstantiator),
        })
    }

    /// Replace how caller-owned objects first seen as arguments are built.
    pub fn with_instantiator(mut self, instantiator: impl Instantiator + Send + 'static) -> Self {
        self.instantiator = Box::new(instantiator);
        self
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Answer one request. `Ok(false)` once the caller has hung up.
    pub fn serve_one(&mut self) -> Result<bool> {
        let Some(request) =
            Packet::read_from(&mut self.stream, &mut self.registry, &*self.instantiator)?
        else {
            return Ok(false);
        };

        let reply = match request {
            Packet::MethodCall(call) => self.invoker.invoke(call)?,
            Packet::FieldFetch(fetch) => self.invoker.fetch_field(fetch)?,
            Packet::NewObject(new) => {
                let obj = self.invoker.construct(&new)?;
                self.registry
                    .insert(new.id, obj)
                    .map_err(crate::codec::CodecError::from)?;
                Value::Null
            }
            Packet::MethodReturn(_) => {
                return Err(BridgeError::UnexpectedPacket {
                    expected: Opcode::MethodCall,
                    received: Opcode::MethodReturn,
                });
            }
        };

        Packet::MethodReturn(reply).write_to(&mut self.stream, &mut self.registry)?;
        Ok(true)
    }

    /// Answer requests until the caller disconnects.
    pub fn serve(&mut self) -> Result<()> {
        while self.serve_one()? {}
        tracing::debug!(handles = self.registry.len(), "caller disconnected");
        self.registry.clear();
        Ok(())
    }

    pub fn into_inner(self) -> (S, I) {
        (self.stream, self.invoker)
    }
}
