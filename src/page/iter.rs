//! Iteration over the live records of a heap page.

use crate::page::HeapPage;
use crate::types::Rid;

/// Iterator over `(Rid, record bytes)` in slot order, skipping tombstones.
///
/// Holds a shared borrow of the page, so the page cannot change mid-scan.
pub struct Records<'a, B> {
    page: &'a HeapPage<B>,
    next: Option<Rid>,
}

impl<'a, B: AsRef<[u8]>> Records<'a, B> {
    pub(crate) fn new(page: &'a HeapPage<B>) -> Self {
        Self {
            page,
            next: page.first_record(),
        }
    }
}

impl<'a, B: AsRef<[u8]>> Iterator for Records<'a, B> {
    type Item = (Rid, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.page;
        let rid = self.next.take()?;
        let record = page.return_record(rid).ok()?;
        self.next = page.next_record(rid).ok().flatten();
        Some((rid, record))
    }
}
