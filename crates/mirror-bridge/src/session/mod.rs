//! Caller and executor ends of one channel.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

mod caller;
mod executor;
mod shared;

#[cfg(all(test, unix))]
mod session_tests;

pub use caller::Caller;
pub use executor::{Executor, InvokeError, Invoker};
pub use shared::SharedCaller;

/// Timeouts applied to the underlying stream.
#[derive(Clone, Debug, Default)]
pub struct ChannelConfig {
    /// Longest wait for a response (caller) or request (executor).
    pub(crate) read_timeout: Option<Duration>,
    pub(crate) write_timeout: Option<Duration>,
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail a pending read with `Timeout` after `timeout`.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }
}

/// Byte stream a session runs over.
pub trait Transport: Read + Write {
    fn set_timeouts(&self, read: Option<Duration>, write: Option<Duration>) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn set_timeouts(&self, read: Option<Duration>, write: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(read)?;
        self.set_write_timeout(write)
    }
}

#[cfg(unix)]
impl Transport for std::os::unix::net::UnixStream {
    fn set_timeouts(&self, read: Option<Duration>, write: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(read)?;
        self.set_write_timeout(write)
    }
}

fn apply(stream: &impl Transport, config: &ChannelConfig) -> io::Result<()> {
    stream.set_timeouts(config.read_timeout, config.write_timeout)
}
