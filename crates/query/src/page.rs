//! Offset/limit pagination, layered on top of the engine output.
//!
//! Deliberately not a property of the filtering logic: callers paginate the
//! already-ordered view collection.

use serde::{Deserialize, Serialize};

use millstock_core::ValueObject;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    /// `None` means "to the end".
    pub limit: Option<usize>,
}

impl Page {
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    pub fn apply<T>(&self, view: Vec<T>) -> Vec<T> {
        let iter = view.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

impl ValueObject for Page {}
