//! Request identifiers.
//!
//! # Responsibilities
//! - Assign every inbound call a process-unique, monotonically increasing ID
//! - Render it for log correlation
//!
//! # Design Decisions
//! - A single lock-free atomic increment; concurrent calls never share an ID
//! - IDs restart after a process restart, they only correlate log lines
//! - The ID has no security function

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier assigned to a request on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Source of request IDs, shared by every request task.
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    last: AtomicU64,
}

impl RequestIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next ID. The first ID is 1.
    pub fn next_id(&self) -> RequestId {
        RequestId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
