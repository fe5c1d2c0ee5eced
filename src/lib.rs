//! # Heap Page
//!
//! A slotted page for heap files: one fixed-size buffer holding a variable
//! number of variable-length records, addressed through an in-page slot
//! directory and linked to its neighbours in the heap file's page chain.
//!
//! ## Architecture
//!
//! - **Types** (`types`): page size and layout constants, `PageId`, `Rid`,
//!   runtime `PageConfig`
//! - **Page Layer** (`page`): header and slot codecs, the `HeapPage` itself,
//!   record iteration and diagnostic dumps
//!
//! Allocating, pinning and persisting pages belongs to the caller's buffer
//! manager. A `HeapPage` can wrap any exclusively held frame that implements
//! `AsRef<[u8]> + AsMut<[u8]>`.
//!
//! ## Usage
//!
//! ```rust
//! use heap_page::{HeapPage, PageId};
//!
//! let mut page = HeapPage::new(PageId::new(7));
//!
//! let rid = page.insert_record(b"hello")?;
//! assert_eq!(page.get_record(rid)?, b"hello");
//!
//! for (rid, bytes) in page.records() {
//!     println!("{} -> {:?}", rid, bytes);
//! }
//!
//! page.delete_record(rid)?;
//! assert!(page.empty());
//! # Ok::<(), heap_page::StorageError>(())
//! ```

pub mod error;
pub mod page;
pub mod types;

pub use error::{Result, RidError, StorageError};
pub use page::{HeapPage, PageBuf, PageDump, Slot};
pub use types::{
    PageConfig, PageId, Rid, HEADER_SIZE, MAX_RECORD_SIZE, PAGE_SIZE, SLOT_SIZE,
};
