#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Remote invocation for generated mirrors.
//!
//! A [`Caller`] owns the proxies and forwards every call as a framed
//! [`Packet`](protocol::Packet). An [`Executor`] on the other end performs it
//! against the real objects through an [`Invoker`]. Both sides name shared
//! objects by [`Handle`], tracked per session in an [`ObjectRegistry`].

use std::io;

pub mod codec;
pub mod instantiate;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod value;

#[cfg(test)]
mod codec_tests;
#[cfg(test)]
mod instantiate_tests;
#[cfg(test)]
mod registry_tests;
#[cfg(test)]
mod value_tests;

pub use codec::{CodecError, WireValue};
pub use instantiate::{
    InstantiateError, Instantiator, ManifestInstantiator, Placeholder, PlaceholderInstantiator,
};
pub use protocol::{FrameError, Opcode, Packet};
pub use registry::{Handle, ObjectRegistry, RegistryError, Role};
pub use session::{Caller, ChannelConfig, Executor, InvokeError, Invoker, SharedCaller, Transport};
pub use value::{CollectionKind, ObjectId, ObjectRef, Value};

/// Version byte the executor sends on accept.
pub const PROTOCOL_VERSION: u8 = 1;

/// Errors that end a call or a session.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("protocol version mismatch: expected {expected}, received {received}")]
    VersionMismatch { expected: u8, received: u8 },

    #[error(transparent)]
    Frame(FrameError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("expected {expected}, received {received}")]
    UnexpectedPacket { expected: Opcode, received: Opcode },

    #[error("unexpected value: {0}")]
    UnexpectedValue(String),

    #[error("timed out waiting for the peer")]
    Timeout,

    #[error("invocation failed: {0}")]
    Invocation(#[from] InvokeError),

    #[error("channel closed by peer")]
    Closed,

    #[error("io error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for BridgeError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Self::Timeout,
            io::ErrorKind::UnexpectedEof => Self::Closed,
            _ => Self::Io(e),
        }
    }
}

impl From<FrameError> for BridgeError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Io(io)
                if matches!(
                    io.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                Self::Timeout
            }
            other => Self::Frame(other),
        }
    }
}

impl From<protocol::PacketError> for BridgeError {
    fn from(e: protocol::PacketError) -> Self {
        match e {
            protocol::PacketError::Frame(f) => f.into(),
            protocol::PacketError::Codec(c) => Self::Codec(c),
        }
    }
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
