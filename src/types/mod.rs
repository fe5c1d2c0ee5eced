//! Common types used throughout the heap page.

mod page_id;
mod rid;

pub use page_id::PageId;
pub use rid::Rid;

use serde::{Deserialize, Serialize};

/// Page size in bytes (4KB). Must match the buffer manager's frame size.
pub const PAGE_SIZE: usize = 4096;

/// Size of the fixed page header: six 32-bit fields
pub const HEADER_SIZE: usize = 24;

/// Size of one slot directory entry: offset and length, 32 bits each
pub const SLOT_SIZE: usize = 8;

/// On-page length value marking a tombstoned slot
pub const TOMBSTONE_LENGTH: i32 = -1;

/// Largest record an empty page can hold (one slot row must fit beside it)
pub const MAX_RECORD_SIZE: usize = PAGE_SIZE - HEADER_SIZE - SLOT_SIZE;

/// Runtime options for a heap page handle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// Re-validate the page layout after every mutation
    pub verify_invariants: bool,
}

impl PageConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable post-mutation invariant checks
    pub fn verify_invariants(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }
}
