use std::{any::Any, collections::HashMap};

use crate::key::ViewKey;

/// Typed per-node state threaded between frames.
///
/// `prior` holds what the previous frame wrote and is read-only for the
/// current frame. `next` collects what the current frame writes and becomes
/// the following frame's `prior`. A value that is not written again in a
/// frame therefore disappears one frame later.
#[derive(Default)]
pub struct Store {
    /// Values written by the previous frame.
    prior: HashMap<ViewKey, Box<dyn Any>>,
    /// Values written by the current frame.
    next: HashMap<ViewKey, Box<dyn Any>>,
}

impl Store {
    /// A store for a new frame, seeded with everything the given store wrote.
    pub fn seeded(previous: Self) -> Self {
        Self {
            prior: previous.next,
            next: HashMap::new(),
        }
    }

    /// Read a value. Values written this frame shadow the seed from the
    /// previous frame. A value of a different type reads as absent.
    pub fn get<T: Clone + 'static>(&self, key: &ViewKey) -> Option<T> {
        self.next
            .get(key)
            .or_else(|| self.prior.get(key))
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }

    /// Write a value for the next frame.
    pub fn put<T: 'static>(&mut self, key: ViewKey, value: T) {
        self.next.insert(key, Box::new(value));
    }

    /// Is there a value visible at this key?
    pub fn contains(&self, key: &ViewKey) -> bool {
        self.next.contains_key(key) || self.prior.contains_key(key)
    }

    /// Number of values written this frame.
    pub fn len(&self) -> usize {
        self.next.len()
    }

    /// Has nothing been written this frame?
    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}
