//! Record identifier.

use super::PageId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of a record: the page it lives on and its slot in that page's
/// directory.
///
/// A `Rid` stays valid from the insert that produced it until the record is
/// deleted, regardless of what happens to other records on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rid {
    pub page_id: PageId,
    pub slot_no: u32,
}

impl Rid {
    pub const fn new(page_id: PageId, slot_no: u32) -> Self {
        Self { page_id, slot_no }
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_id, self.slot_no)
    }
}
