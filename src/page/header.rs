//! Heap page header structure.
//!
//! The header occupies the first bytes of each heap page and records the
//! page chain links plus the bookkeeping needed to place new records.

use crate::types::{PageId, HEADER_SIZE, PAGE_SIZE, SLOT_SIZE};

/// Heap page header
///
/// Layout (24 bytes, big-endian):
/// ```text
/// Offset  Size  Description
/// 0       4     Page ID of this page
/// 4       4     Previous page in the chain (INVALID at the head)
/// 8       4     Next page in the chain (INVALID at the tail)
/// 12      4     Number of slot directory entries
/// 16      4     Offset of the first byte of record storage
/// 20      4     Free bytes, net of header and slot directory
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapPageHeader {
    /// This page
    pub page_id: PageId,
    /// Previous page in the heap file
    pub prev_page: PageId,
    /// Next page in the heap file
    pub next_page: PageId,
    /// Slot directory entries, including interior tombstones
    pub slot_count: u32,
    /// Start of the packed record region `[used_offset, PAGE_SIZE)`
    pub used_offset: u32,
    /// Bytes left for records and directory growth
    pub free_bytes: u32,
}

impl HeapPageHeader {
    /// Header of a freshly formatted, empty page
    pub fn new(page_id: PageId) -> Self {
        Self {
            page_id,
            prev_page: PageId::INVALID,
            next_page: PageId::INVALID,
            slot_count: 0,
            used_offset: PAGE_SIZE as u32,
            free_bytes: (PAGE_SIZE - HEADER_SIZE) as u32,
        }
    }

    /// Read a page header from bytes
    pub fn read(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE {
            return None;
        }

        let field =
            |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

        Some(Self {
            page_id: PageId::new(field(0)),
            prev_page: PageId::new(field(4)),
            next_page: PageId::new(field(8)),
            slot_count: field(12),
            used_offset: field(16),
            free_bytes: field(20),
        })
    }

    /// Write this header to bytes
    pub fn write(&self, bytes: &mut [u8]) {
        bytes[0..4].copy_from_slice(&self.page_id.value().to_be_bytes());
        bytes[4..8].copy_from_slice(&self.prev_page.value().to_be_bytes());
        bytes[8..12].copy_from_slice(&self.next_page.value().to_be_bytes());
        bytes[12..16].copy_from_slice(&self.slot_count.to_be_bytes());
        bytes[16..20].copy_from_slice(&self.used_offset.to_be_bytes());
        bytes[20..24].copy_from_slice(&self.free_bytes.to_be_bytes());
    }

    /// Offset just past the last slot directory entry
    pub fn slot_directory_end(&self) -> usize {
        HEADER_SIZE + self.slot_count as usize * SLOT_SIZE
    }

    /// Bytes occupied by records
    pub fn record_bytes(&self) -> usize {
        PAGE_SIZE.saturating_sub(self.used_offset as usize)
    }

    /// What `free_bytes` must be for the current slot count and used offset.
    ///
    /// `None` when the directory and the record region overlap.
    pub fn expected_free_bytes(&self) -> Option<usize> {
        (self.used_offset as usize).checked_sub(self.slot_directory_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = HeapPageHeader {
            page_id: PageId::new(9),
            prev_page: PageId::new(8),
            next_page: PageId::INVALID,
            slot_count: 5,
            used_offset: 3500,
            free_bytes: 3436,
        };

        let mut bytes = [0u8; HEADER_SIZE];
        header.write(&mut bytes);

        assert_eq!(HeapPageHeader::read(&bytes), Some(header));
        assert_eq!(&bytes[8..12], &[0xFF; 4]);
    }

    #[test]
    fn test_read_short_buffer() {
        assert_eq!(HeapPageHeader::read(&[0u8; HEADER_SIZE - 1]), None);
    }

    #[test]
    fn test_free_space() {
        let header = HeapPageHeader::new(PageId::new(1));
        assert_eq!(header.free_bytes as usize, PAGE_SIZE - HEADER_SIZE);
        assert_eq!(header.expected_free_bytes(), Some(header.free_bytes as usize));
        assert_eq!(header.record_bytes(), 0);
        assert_eq!(header.slot_directory_end(), HEADER_SIZE);
    }
}
