//! Pointer ids and the value heap
//!
//! Shared and cyclic structure is expressed with [`Value::Pointer`]: the
//! pointer holds a [`PointerId`] and the [`Heap`] owns the pointee. A list
//! that contains itself is a heap slot whose list holds a pointer to the same
//! slot.
//!
//! Id `0` is the null pointer and never names a slot.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Heap slot id; `0` is null
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PointerId(u64);

impl PointerId {
    /// The null pointer
    pub const NULL: PointerId = PointerId(0);

    /// Wrap a raw id
    #[inline]
    pub const fn new(id: u64) -> Self {
        PointerId(id)
    }

    /// Raw id
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether this is the null pointer
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PointerId {
    fn from(id: u64) -> Self {
        PointerId(id)
    }
}

/// Arena of pointees addressed by [`PointerId`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Heap {
    slots: BTreeMap<PointerId, Value>,
}

impl Heap {
    /// Empty heap
    pub fn new() -> Self {
        Heap::default()
    }

    /// Claim a slot before its value is known
    ///
    /// The slot holds `Null` until [`Heap::insert`] fills it, which lets a
    /// pointee refer to its own id while it is being built. Returns `false`
    /// if the id is null or already claimed.
    pub fn reserve(&mut self, id: PointerId) -> bool {
        if id.is_null() || self.slots.contains_key(&id) {
            return false;
        }
        self.slots.insert(id, Value::Null);
        true
    }

    /// Store a pointee, replacing any reserved placeholder
    ///
    /// Returns the previous value of the slot. Null ids are ignored.
    pub fn insert(&mut self, id: PointerId, value: Value) -> Option<Value> {
        if id.is_null() {
            return None;
        }
        self.slots.insert(id, value)
    }

    /// The pointee for an id
    pub fn get(&self, id: PointerId) -> Option<&Value> {
        self.slots.get(&id)
    }

    /// Whether the id has a slot
    pub fn contains(&self, id: PointerId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Follow pointers until a non-pointer value, stopping at cycles
    pub fn resolve<'a>(&'a self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        let mut hops = 0;
        while let Value::Pointer(id) = current {
            if hops > self.slots.len() {
                return None;
            }
            current = self.slots.get(id)?;
            hops += 1;
        }
        Some(current)
    }

    /// Slots in id order
    pub fn iter(&self) -> btree_map::Iter<'_, PointerId, Value> {
        self.slots.iter()
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the heap is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
