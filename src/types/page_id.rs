//! Page identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a page within a heap file.
///
/// The heap page never interprets the value beyond equality; allocation
/// belongs to whoever owns the file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct PageId(pub u32);

impl PageId {
    /// Invalid page ID, marks either end of a page chain
    pub const INVALID: PageId = PageId(u32::MAX);

    /// Create a new page ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw page ID value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Check if this is a valid page ID
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "INVALID")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<u32> for PageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<PageId> for u32 {
    fn from(id: PageId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_basics() {
        let id = PageId::new(42);
        assert_eq!(id.value(), 42);
        assert!(id.is_valid());
        assert!(!PageId::INVALID.is_valid());
        assert_eq!(PageId::default(), PageId::new(0));
    }

    #[test]
    fn test_page_id_display() {
        assert_eq!(format!("{}", PageId::new(7)), "7");
        assert_eq!(format!("{}", PageId::INVALID), "INVALID");
    }
}
