use std::sync::Arc;

use parking_lot::Mutex;

use super::Caller;
use crate::Result;
use crate::value::{ObjectRef, Value};

/// A [`Caller`] usable from several threads.
///
/// The lock is held across send and receive, so a request is always paired
/// with its own response.
pub struct SharedCaller<S>(Arc<Mutex<Caller<S>>>);

impl<S> Clone for SharedCaller<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S: super::Transport> SharedCaller<S> {
    pub fn new(caller: Caller<S>) -> Self {
        Self(Arc::new(Mutex::new(caller)))
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut Caller<S>) -> R) -> R {
        f(&mut self.0.lock())
    }

    pub fn call(&self, target: &ObjectRef, owner: &str, method: &str, args: Vec<Value>) -> Result<Value> {
        self.with(|c| c.call(target, owner, method, args))
    }

    pub fn call_static(&self, owner: &str, method: &str, args: Vec<Value>) -> Result<Value> {
        self.with(|c| c.call_static(owner, method, args))
    }

    pub fn fetch_field(&self, target: &ObjectRef, owner: &str, field: &str) -> Result<Value> {
        self.with(|c| c.fetch_field(target, owner, field))
    }

    pub fn fetch_static_field(&self, owner: &str, field: &str) -> Result<Value> {
        self.with(|c| c.fetch_static_field(owner, field))
    }
}
