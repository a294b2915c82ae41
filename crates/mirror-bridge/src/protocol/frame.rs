//! `[u16 BE opcode][u16 BE length][UTF-8 JSON payload]`

use std::io::{self, Read, Write};

use super::Opcode;

/// Opcode plus length.
pub const HEADER_SIZE: usize = 4;

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("unknown opcode {0}")]
    UnknownOpcode(u16),

    #[error("payload of {0} bytes exceeds the 65535-byte frame limit")]
    PayloadTooLarge(usize),

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type FrameResult<T> = Result<T, FrameError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub payload: String,
}

impl Frame {
    pub fn new(opcode: Opcode, payload: impl Into<String>) -> Self {
        Self {
            opcode,
            payload: payload.into(),
        }
    }

    /// Header and payload as one buffer.
    pub fn to_bytes(&self) -> FrameResult<Vec<u8>> {
        let body = self.payload.as_bytes();
        let len = u16::try_from(body.len()).map_err(|_| FrameError::PayloadTooLarge(body.len()))?;

        let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
        out.extend_from_slice(&self.opcode.to_u16().to_be_bytes());
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(body);
        Ok(out)
    }
}

pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> FrameResult<()> {
    // One write per frame so a concurrent reader never sees a torn header.
    let bytes = frame.to_bytes()?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read one frame. `Ok(None)` on a clean end of stream before the header.
pub fn read_frame<R: Read>(reader: &mut R) -> FrameResult<Option<Frame>> {
    let mut header = [0_u8; HEADER_SIZE];
    if !read_header(reader, &mut header)? {
        return Ok(None);
    }

    let raw = u16::from_be_bytes([header[0], header[1]]);
    let opcode = Opcode::from_u16(raw).ok_or(FrameError::UnknownOpcode(raw))?;
    let len = usize::from(u16::from_be_bytes([header[2], header[3]]));

    let mut body = vec![0_u8; len];
    reader.read_exact(&mut body)?;
    let payload = String::from_utf8(body).map_err(|_| FrameError::InvalidUtf8)?;
    Ok(Some(Frame { opcode, payload }))
}

/// Fill `buf`, returning false if the stream ended before its first byte.
fn read_header<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}
