//! Error types for the heap page.

use crate::types::{PageId, Rid};
use thiserror::Error;

/// Result type alias for page operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Why a record identifier was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RidError {
    /// The page has no slots at all
    #[error("page has no slots")]
    EmptyPage,
    /// The identifier names a different page
    #[error("record belongs to another page")]
    WrongPage,
    /// The slot number is past the end of the directory
    #[error("slot number out of range")]
    SlotOutOfRange,
    /// The slot has been deleted
    #[error("slot is a tombstone")]
    Deleted,
}

/// Errors that can occur on a heap page
#[derive(Error, Debug)]
pub enum StorageError {
    /// Page does not have enough space for the record
    #[error("Page {page_id} is full, need {needed} bytes but only {available} available")]
    PageFull {
        page_id: PageId,
        needed: usize,
        available: usize,
    },

    /// Record identifier does not address a live record on this page
    #[error("Invalid record {rid}: {reason}")]
    InvalidRecord { rid: Rid, reason: RidError },

    /// Record length is zero or larger than the page itself
    #[error("Invalid record length: {length} bytes (max: {max})")]
    InvalidRecordLength { length: usize, max: usize },

    /// Invalid page format
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// Page layout invariant does not hold
    #[error("Corruption detected: {0}")]
    Corruption(String),
}

impl StorageError {
    /// Create a corruption error with a message
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }

    /// Create an invalid page error
    pub fn invalid_page(msg: impl Into<String>) -> Self {
        Self::InvalidPage(msg.into())
    }

    /// Create an invalid record error
    pub fn invalid_record(rid: Rid, reason: RidError) -> Self {
        Self::InvalidRecord { rid, reason }
    }

    /// True for the routine "no room" outcome
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::PageFull { .. })
    }

    /// True when the caller passed a stale or foreign record identifier
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. })
    }
}
