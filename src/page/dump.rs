//! Diagnostic snapshot of a heap page.

use crate::page::Slot;
use crate::types::PageId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One slot directory entry as shown in a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SlotDump {
    Live { offset: u32, length: u32 },
    Tombstone,
}

impl From<Slot> for SlotDump {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Live { offset, length } => Self::Live { offset, length },
            Slot::Tombstone => Self::Tombstone,
        }
    }
}

/// Header fields and slot directory of a page, for debugging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDump {
    pub page_id: PageId,
    pub prev_page: PageId,
    pub next_page: PageId,
    pub slot_count: u32,
    pub used_offset: u32,
    pub free_bytes: u32,
    pub slots: Vec<SlotDump>,
}

impl PageDump {
    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PageDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "curPage={}, prevPage={}, nextPage={}",
            self.page_id, self.prev_page, self.next_page
        )?;
        write!(
            f,
            "usedOffset={}, freeBytes={}, slotCount={}",
            self.used_offset, self.free_bytes, self.slot_count
        )?;
        for (i, slot) in self.slots.iter().enumerate() {
            match slot {
                SlotDump::Live { offset, length } => write!(
                    f,
                    "\nslot[{i}].offset={offset}, slot[{i}].length={length}"
                )?,
                SlotDump::Tombstone => write!(f, "\nslot[{i}] empty")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::page::HeapPage;
    use crate::types::PageId;

    #[test]
    fn test_dump_display() {
        let mut page = HeapPage::new(PageId::new(7));
        page.set_prev_page(PageId::new(6));
        let a = page.insert_record(b"0123456789").unwrap();
        page.insert_record(b"abcd").unwrap();
        page.delete_record(a).unwrap();

        let text = page.dump().to_string();
        assert_eq!(
            text,
            "curPage=7, prevPage=6, nextPage=INVALID\n\
             usedOffset=4092, freeBytes=4052, slotCount=2\n\
             slot[0] empty\n\
             slot[1].offset=4092, slot[1].length=4"
        );
    }

    #[test]
    fn test_dump_json() {
        let mut page = HeapPage::new(PageId::new(2));
        page.insert_record(b"xyz").unwrap();

        let json = page.dump().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pageId"], 2);
        assert_eq!(value["nextPage"], u32::MAX);
        assert_eq!(value["slots"][0]["state"], "live");
        assert_eq!(value["slots"][0]["length"], 3);
    }
}
