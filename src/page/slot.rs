//! Slot directory entries.
//!
//! Each entry is eight bytes on the page: a big-endian `i32` offset followed
//! by a big-endian `i32` length. A length of [`TOMBSTONE_LENGTH`] marks a
//! deleted record; any other length must be positive.

use crate::types::{SLOT_SIZE, TOMBSTONE_LENGTH};
use std::ops::Range;

/// One entry of the slot directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A record occupying `[offset, offset + length)`
    Live { offset: u32, length: u32 },
    /// A deleted record whose slot number may be reused
    Tombstone,
}

impl Slot {
    /// Create a live slot
    pub fn live(offset: usize, length: usize) -> Self {
        Self::Live {
            offset: offset as u32,
            length: length as u32,
        }
    }

    /// Check if this slot addresses a record
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }

    /// Byte range of the record, if any
    pub fn range(&self) -> Option<Range<usize>> {
        match *self {
            Self::Live { offset, length } => {
                Some(offset as usize..offset as usize + length as usize)
            }
            Self::Tombstone => None,
        }
    }

    /// Encode this slot into its on-page form
    pub fn encode(&self) -> [u8; SLOT_SIZE] {
        let (offset, length) = match *self {
            Self::Live { offset, length } => (offset as i32, length as i32),
            Self::Tombstone => (0, TOMBSTONE_LENGTH),
        };

        let mut buf = [0u8; SLOT_SIZE];
        buf[0..4].copy_from_slice(&offset.to_be_bytes());
        buf[4..8].copy_from_slice(&length.to_be_bytes());
        buf
    }

    /// Decode a slot from bytes
    ///
    /// Returns `None` for a negative offset or a non-positive length other
    /// than the tombstone marker.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < SLOT_SIZE {
            return None;
        }

        let offset = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let length = i32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        if length == TOMBSTONE_LENGTH {
            return Some(Self::Tombstone);
        }
        if offset < 0 || length <= 0 {
            return None;
        }

        Some(Self::Live {
            offset: offset as u32,
            length: length as u32,
        })
    }
}
