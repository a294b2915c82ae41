//! Handle ↔ object bookkeeping for one session.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{ObjectId, ObjectRef};

/// Opaque 64-bit name for an object shared over a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which end of the channel a registry belongs to.
///
/// Each side reserves handles from its own half of the space, so two sides
/// registering fresh objects at the same time never pick the same handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Caller,
    Executor,
}

impl Role {
    const EXECUTOR_BASE: u64 = 1 << 63;

    fn first_handle(self) -> u64 {
        match self {
            Self::Caller => 0,
            Self::Executor => Self::EXECUTOR_BASE,
        }
    }

    fn owns(self, handle: Handle) -> bool {
        match self {
            Self::Caller => handle.0 < Self::EXECUTOR_BASE,
            Self::Executor => handle.0 >= Self::EXECUTOR_BASE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("object not found for handle {0}")]
    ObjectNotFound(Handle),

    #[error("handle {handle} is already bound to a different {class}")]
    HandleInUse { handle: Handle, class: String },

    #[error("{class} is already registered as {existing}")]
    AlreadyRegistered { class: String, existing: Handle },

    #[error("handle space exhausted")]
    Exhausted,
}

/// Bidirectional map between handles and live objects.
///
/// At most one handle per object and one object per handle. Objects are keyed
/// by [`ObjectId`], so structurally equal objects still get distinct handles.
#[derive(Debug)]
pub struct ObjectRegistry {
    role: Role,
    by_handle: HashMap<Handle, ObjectRef>,
    by_object: HashMap<ObjectId, Handle>,
    next: u64,
}

impl ObjectRegistry {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            by_handle: HashMap::new(),
            by_object: HashMap::new(),
            next: role.first_handle(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn get(&self, handle: Handle) -> Option<&ObjectRef> {
        self.by_handle.get(&handle)
    }

    /// Like [`get`](Self::get), failing with `ObjectNotFound`.
    pub fn object(&self, handle: Handle) -> Result<&ObjectRef, RegistryError> {
        self.get(handle).ok_or(RegistryError::ObjectNotFound(handle))
    }

    pub fn handle_of(&self, obj: &ObjectRef) -> Option<Handle> {
        self.by_object.get(&obj.id()).copied()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.by_handle.contains_key(&handle)
    }

    /// Bind `obj` under a handle chosen by the other side.
    ///
    /// Re-inserting the same pair is a no-op.
    pub fn insert(&mut self, handle: Handle, obj: ObjectRef) -> Result<(), RegistryError> {
        if let Some(existing) = self.by_handle.get(&handle) {
            if existing.ptr_eq(&obj) {
                return Ok(());
            }
            return Err(RegistryError::HandleInUse {
                handle,
                class: existing.class().to_string(),
            });
        }
        if let Some(&existing) = self.by_object.get(&obj.id()) {
            return Err(RegistryError::AlreadyRegistered {
                class: obj.class().to_string(),
                existing,
            });
        }

        self.by_object.insert(obj.id(), handle);
        self.by_handle.insert(handle, obj);
        Ok(())
    }

    /// Handle for `obj`, registering it under a fresh handle on first sight.
    pub fn reserve(&mut self, obj: &ObjectRef) -> Result<Handle, RegistryError> {
        if let Some(handle) = self.handle_of(obj) {
            return Ok(handle);
        }

        let handle = self.next_free()?;
        tracing::debug!(%handle, class = obj.class(), "registered object");
        self.by_object.insert(obj.id(), handle);
        self.by_handle.insert(handle, obj.clone());
        Ok(handle)
    }

    /// Drop the binding for `handle`, returning the object it named.
    pub fn release(&mut self, handle: Handle) -> Option<ObjectRef> {
        let obj = self.by_handle.remove(&handle)?;
        self.by_object.remove(&obj.id());
        tracing::debug!(%handle, class = obj.class(), "released object");
        Some(obj)
    }

    fn next_free(&mut self) -> Result<Handle, RegistryError> {
        loop {
            let handle = Handle(self.next);
            if !self.role.owns(handle) {
                return Err(RegistryError::Exhausted);
            }
            self.next = self.next.checked_add(1).ok_or(RegistryError::Exhausted)?;
            if !self.by_handle.contains_key(&handle) {
                return Ok(handle);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &ObjectRef)> {
        self.by_handle.iter().map(|(&h, o)| (h, o))
    }

    /// Forget every binding and restart the handle counter.
    pub fn clear(&mut self) {
        self.by_handle.clear();
        self.by_object.clear();
        self.next = self.role.first_handle();
    }
}
