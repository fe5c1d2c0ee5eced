//! Heap page implementation.
//!
//! A heap page uses the following layout:
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                 Page Header (24 B)                  │
//! ├────────────────────────────────────────────────────┤
//! │                  Slot Directory                     │
//! │  [slot0][slot1][slot2]...      →                   │
//! ├────────────────────────────────────────────────────┤
//! │                                                    │
//! │                   Free Space                        │
//! │                                                    │
//! ├────────────────────────────────────────────────────┤
//! │                  Record Region                      │
//! │      ←  [rec2][rec1][rec0]                         │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! The record region `[used_offset, PAGE_SIZE)` is always packed: deleting a
//! record slides every more recently placed record up over the hole. Slot
//! numbers never move, so record identifiers survive that compaction.
//! Deleted slots become tombstones that the next insert reuses; tombstones at
//! the end of the directory are trimmed immediately.

use crate::error::{Result, RidError, StorageError};
use crate::page::{HeapPageHeader, PageBuf, PageDump, Records, Slot, SlotDump};
use crate::types::{PageConfig, PageId, Rid, HEADER_SIZE, PAGE_SIZE, SLOT_SIZE};
use std::ops::Range;
use tracing::{debug, trace};

/// A slotted heap page over an exclusively held page buffer
#[derive(Clone)]
pub struct HeapPage<B = PageBuf> {
    /// The raw page data
    data: B,
    /// Cached header (kept in sync with data)
    header: HeapPageHeader,
    config: PageConfig,
}

impl HeapPage<PageBuf> {
    /// Create an empty page backed by a fresh buffer
    pub fn new(page_id: PageId) -> Self {
        Self::format(PageBuf::new(), page_id)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> HeapPage<B> {
    /// Format `data` as an empty heap page, overwriting whatever it held
    pub fn init(data: B, page_id: PageId) -> Result<Self> {
        check_buffer_len(data.as_ref())?;
        Ok(Self::format(data, page_id))
    }

    fn format(data: B, page_id: PageId) -> Self {
        let mut page = Self {
            data,
            header: HeapPageHeader::new(page_id),
            config: PageConfig::default(),
        };
        page.sync_header();
        trace!(target: "heap_page::init", page = page_id.value(), "formatted heap page");
        page
    }

    /// Reset this page to the empty state under a (possibly new) page ID
    pub fn reset(&mut self, page_id: PageId) {
        self.header = HeapPageHeader::new(page_id);
        self.sync_header();
        trace!(target: "heap_page::init", page = page_id.value(), "reset heap page");
    }

    /// Set the previous page in the chain
    pub fn set_prev_page(&mut self, page_id: PageId) {
        self.header.prev_page = page_id;
        self.sync_header();
    }

    /// Set the next page in the chain
    pub fn set_next_page(&mut self, page_id: PageId) {
        self.header.next_page = page_id;
        self.sync_header();
    }

    /// Insert a record, returning its identifier
    ///
    /// The first tombstoned slot is reused if there is one; otherwise a new
    /// slot is appended and its directory row is charged against free space.
    /// Fails with [`StorageError::PageFull`] without touching the page when
    /// the record does not fit.
    pub fn insert_record(&mut self, record: &[u8]) -> Result<Rid> {
        let length = record.len();
        if length == 0 || length > PAGE_SIZE {
            return Err(StorageError::InvalidRecordLength {
                length,
                max: PAGE_SIZE,
            });
        }

        let reused = self.first_tombstone();
        let needed = match reused {
            Some(_) => length,
            None => length + SLOT_SIZE,
        };
        let available = self.header.free_bytes as usize;

        if needed > available {
            debug!(
                target: "heap_page::insert",
                page = self.header.page_id.value(),
                needed,
                available,
                "record does not fit"
            );
            return Err(StorageError::PageFull {
                page_id: self.header.page_id,
                needed,
                available,
            });
        }

        let slot_no = reused.unwrap_or(self.header.slot_count as usize);
        let offset = self.header.used_offset as usize - length;

        self.data.as_mut()[offset..offset + length].copy_from_slice(record);
        self.set_slot(slot_no, Slot::live(offset, length));

        self.header.used_offset = offset as u32;
        self.header.free_bytes -= needed as u32;
        if reused.is_none() {
            self.header.slot_count += 1;
        }
        self.sync_header();

        trace!(
            target: "heap_page::insert",
            page = self.header.page_id.value(),
            slot = slot_no,
            len = length,
            free = self.header.free_bytes,
            "inserted record"
        );

        self.verify_after_mutation()?;
        Ok(Rid::new(self.header.page_id, slot_no as u32))
    }

    /// Delete a record and compact the record region over the hole it leaves
    pub fn delete_record(&mut self, rid: Rid) -> Result<()> {
        let range = self.live_range(rid)?;
        let (off, len) = (range.start, range.len());
        let used = self.header.used_offset as usize;

        // Everything placed after the victim sits in [used, off); slide it up
        // by `len`. The ranges overlap whenever that span is longer than `len`.
        self.data.as_mut().copy_within(used..off, used + len);

        for index in 0..self.header.slot_count as usize {
            if let Slot::Live { offset, length } = self.slot_at(index) {
                if (offset as usize) < off {
                    self.set_slot(index, Slot::live(offset as usize + len, length as usize));
                }
            }
        }

        self.header.used_offset += len as u32;
        self.header.free_bytes += len as u32;
        self.set_slot(rid.slot_no as usize, Slot::Tombstone);

        let mut trimmed = 0usize;
        while self.header.slot_count > 0
            && !self.slot_at(self.header.slot_count as usize - 1).is_live()
        {
            self.header.slot_count -= 1;
            self.header.free_bytes += SLOT_SIZE as u32;
            trimmed += 1;
        }
        self.sync_header();

        trace!(
            target: "heap_page::delete",
            page = self.header.page_id.value(),
            slot = rid.slot_no,
            len,
            trimmed,
            free = self.header.free_bytes,
            "deleted record"
        );

        self.verify_after_mutation()
    }

    fn set_slot(&mut self, index: usize, slot: Slot) {
        let at = HEADER_SIZE + index * SLOT_SIZE;
        self.data.as_mut()[at..at + SLOT_SIZE].copy_from_slice(&slot.encode());
    }

    /// Sync the header to the raw page data
    fn sync_header(&mut self) {
        self.header.write(self.data.as_mut());
    }

    fn verify_after_mutation(&self) -> Result<()> {
        if !self.config.verify_invariants {
            return Ok(());
        }
        self.check_invariants().map_err(|e| {
            debug!(target: "heap_page::verify", page = self.header.page_id.value(), error = %e, "invariant violated");
            e
        })
    }
}

impl<B: AsRef<[u8]>> HeapPage<B> {
    /// Adopt an already formatted page image, validating its layout
    pub fn open(data: B) -> Result<Self> {
        check_buffer_len(data.as_ref())?;
        let header = HeapPageHeader::read(data.as_ref())
            .ok_or_else(|| StorageError::invalid_page("invalid page header"))?;

        let page = Self {
            data,
            header,
            config: PageConfig::default(),
        };
        page.check_invariants()?;
        Ok(page)
    }

    /// Replace the page's runtime options
    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the page's runtime options
    pub fn config(&self) -> PageConfig {
        self.config
    }

    /// Get the raw bytes of this page
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Give the buffer back to its owner
    pub fn into_inner(self) -> B {
        self.data
    }

    /// Get the page header
    pub fn header(&self) -> &HeapPageHeader {
        &self.header
    }

    pub fn page_id(&self) -> PageId {
        self.header.page_id
    }

    /// Previous page in the chain, or `PageId::INVALID`
    pub fn prev_page(&self) -> PageId {
        self.header.prev_page
    }

    /// Next page in the chain, or `PageId::INVALID`
    pub fn next_page(&self) -> PageId {
        self.header.next_page
    }

    /// Number of slot directory entries, tombstones included
    pub fn slot_count(&self) -> usize {
        self.header.slot_count as usize
    }

    /// Number of live records
    pub fn record_count(&self) -> usize {
        (0..self.slot_count())
            .filter(|&i| self.slot_at(i).is_live())
            .count()
    }

    /// Start of the packed record region
    pub fn used_offset(&self) -> usize {
        self.header.used_offset as usize
    }

    /// Get the slot directory entry at `index`
    pub fn slot(&self, index: usize) -> Option<Slot> {
        (index < self.slot_count()).then(|| self.slot_at(index))
    }

    // Entries below slot_count are validated by `open` and only ever
    // written through `set_slot`.
    fn slot_at(&self, index: usize) -> Slot {
        let at = HEADER_SIZE + index * SLOT_SIZE;
        Slot::decode(&self.data.as_ref()[at..at + SLOT_SIZE]).unwrap_or(Slot::Tombstone)
    }

    fn first_tombstone(&self) -> Option<usize> {
        (0..self.slot_count()).find(|&i| !self.slot_at(i).is_live())
    }

    /// Resolve `rid` to the byte range of a live record on this page
    fn live_range(&self, rid: Rid) -> Result<Range<usize>> {
        let reason = if self.header.slot_count == 0 {
            RidError::EmptyPage
        } else if rid.page_id != self.header.page_id {
            RidError::WrongPage
        } else if rid.slot_no >= self.header.slot_count {
            RidError::SlotOutOfRange
        } else {
            match self.slot_at(rid.slot_no as usize).range() {
                Some(range) => return Ok(range),
                None => RidError::Deleted,
            }
        };
        Err(StorageError::invalid_record(rid, reason))
    }

    /// Copy out the record addressed by `rid`
    pub fn get_record(&self, rid: Rid) -> Result<Vec<u8>> {
        self.return_record(rid).map(<[u8]>::to_vec)
    }

    /// Borrow the record addressed by `rid` in place
    ///
    /// The view cannot outlive the borrow of the page, so no insert, delete
    /// or reset can move the bytes while it is held.
    pub fn return_record(&self, rid: Rid) -> Result<&[u8]> {
        let range = self.live_range(rid)?;
        Ok(&self.data.as_ref()[range])
    }

    /// Identifier of the live record with the lowest slot number
    pub fn first_record(&self) -> Option<Rid> {
        self.live_slot_from(0)
    }

    /// Identifier of the next live record after `rid` in slot order
    ///
    /// `Ok(None)` once the scan runs off the end. Slot numbers are reused, so
    /// a scan interleaved with inserts or deletes may skip or repeat records.
    pub fn next_record(&self, rid: Rid) -> Result<Option<Rid>> {
        self.live_range(rid)?;
        Ok(self.live_slot_from(rid.slot_no as usize + 1))
    }

    fn live_slot_from(&self, start: usize) -> Option<Rid> {
        (start..self.slot_count())
            .find(|&i| self.slot_at(i).is_live())
            .map(|i| Rid::new(self.header.page_id, i as u32))
    }

    /// Iterate over all live records in slot order
    pub fn records(&self) -> Records<'_, B> {
        Records::new(self)
    }

    /// Free bytes net of the header and the current slot directory
    ///
    /// Appending a record that needs a new slot costs `SLOT_SIZE` on top of
    /// its length; see [`HeapPage::max_record_len`].
    pub fn available_space(&self) -> usize {
        self.header.free_bytes as usize
    }

    /// Largest record `insert_record` would accept right now
    pub fn max_record_len(&self) -> usize {
        let free = self.available_space();
        match self.first_tombstone() {
            Some(_) => free,
            None => free.saturating_sub(SLOT_SIZE),
        }
    }

    /// Check if the page holds no live records
    pub fn empty(&self) -> bool {
        let empty = self.first_record().is_none();
        if empty && self.header.slot_count > 0 {
            debug!(
                target: "heap_page::verify",
                page = self.header.page_id.value(),
                slots = self.header.slot_count,
                "directory holds only tombstones"
            );
        }
        empty
    }

    /// Verify the page layout
    ///
    /// Checks that the directory and record region do not overlap, that the
    /// free byte count matches the space between them, that the last slot is
    /// live, and that live records tile the record region exactly.
    pub fn check_invariants(&self) -> Result<()> {
        let header = &self.header;
        let used = header.used_offset as usize;

        if used > PAGE_SIZE {
            return Err(StorageError::corruption(format!(
                "used offset {} beyond page end",
                used
            )));
        }
        let expected_free = header.expected_free_bytes().ok_or_else(|| {
            StorageError::corruption(format!(
                "slot directory ends at {} past used offset {}",
                header.slot_directory_end(),
                used
            ))
        })?;
        if header.free_bytes as usize != expected_free {
            return Err(StorageError::corruption(format!(
                "free bytes {} but layout leaves {}",
                header.free_bytes, expected_free
            )));
        }

        let mut ranges = Vec::with_capacity(self.slot_count());
        for index in 0..self.slot_count() {
            let at = HEADER_SIZE + index * SLOT_SIZE;
            let slot = Slot::decode(&self.data.as_ref()[at..at + SLOT_SIZE]).ok_or_else(|| {
                StorageError::corruption(format!("slot {} is undecodable", index))
            })?;
            if let Some(range) = slot.range() {
                ranges.push((range, index));
            }
        }

        if header.slot_count > 0 && !self.slot_at(self.slot_count() - 1).is_live() {
            return Err(StorageError::corruption(format!(
                "trailing tombstone at slot {}",
                header.slot_count - 1
            )));
        }

        ranges.sort_by_key(|(range, _)| range.start);
        let mut cursor = used;
        for (range, index) in ranges {
            if range.start != cursor {
                return Err(StorageError::corruption(format!(
                    "slot {} starts at {} but expected {}",
                    index, range.start, cursor
                )));
            }
            cursor = range.end;
        }
        if cursor != PAGE_SIZE {
            return Err(StorageError::corruption(format!(
                "live records end at {} instead of page end",
                cursor
            )));
        }

        Ok(())
    }

    /// Snapshot the header and slot directory for debugging
    pub fn dump(&self) -> PageDump {
        let header = &self.header;
        PageDump {
            page_id: header.page_id,
            prev_page: header.prev_page,
            next_page: header.next_page,
            slot_count: header.slot_count,
            used_offset: header.used_offset,
            free_bytes: header.free_bytes,
            slots: (0..self.slot_count())
                .map(|i| SlotDump::from(self.slot_at(i)))
                .collect(),
        }
    }
}

fn check_buffer_len(data: &[u8]) -> Result<()> {
    if data.len() != PAGE_SIZE {
        return Err(StorageError::invalid_page(format!(
            "buffer is {} bytes, expected {}",
            data.len(),
            PAGE_SIZE
        )));
    }
    Ok(())
}
