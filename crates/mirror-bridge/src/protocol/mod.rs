//! Framed packets exchanged between caller and executor.

pub mod frame;
mod opcode;
mod packet;


pub use frame::{Frame, FrameError};
pub use opcode::Opcode;
pub use packet::{FieldFetch, MethodCall, NewObject, Packet, PacketError};
