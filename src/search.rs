//! Filtering and pagination over the working set.
//!
//! Both are recomputed from scratch on every frame; nothing here caches.
use crate::model::UserRecord;

/// Rows shown per page.
pub const PAGE_SIZE: usize = 10;

/// Case-insensitive substring match against `name+id`, `name` or `email`.
///
/// `query_folded` must already be lowercased.
pub fn matches(record: &UserRecord, query_folded: &str) -> bool {
    if query_folded.is_empty() {
        return true;
    }
    record.username().to_lowercase().contains(query_folded)
        || record.name.to_lowercase().contains(query_folded)
        || record.email.to_lowercase().contains(query_folded)
}

/// Records matching `query`, in working-set order.
pub fn filter_records<'a>(records: &'a [UserRecord], query: &str) -> Vec<&'a UserRecord> {
    let q = query.to_lowercase();
    records.iter().filter(|r| matches(r, &q)).collect()
}

/// Number of pages needed for `count` records; zero when there are none.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Bring a 1-based page number into `1..=total`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// The rows to draw for one frame, plus what the pager needs.
#[derive(Debug)]
pub struct PageView<'a> {
    pub rows: Vec<&'a UserRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered: usize,
}

impl PageView<'_> {
    /// The pager is only offered when there is more than one page.
    pub fn show_pager(&self) -> bool {
        self.total_pages > 1
    }
}

/// Filter `records` by `query` and cut out `page`.
///
/// With at most [`PAGE_SIZE`] matches everything is shown on one implicit page.
pub fn page_view<'a>(records: &'a [UserRecord], query: &str, page: usize) -> PageView<'a> {
    let filtered = filter_records(records, query);
    let count = filtered.len();
    let total = total_pages(count);
    let page = clamp_page(page, total);
    let rows = if count > PAGE_SIZE {
        let start = (page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(count);
        filtered[start..end].to_vec()
    } else {
        filtered
    };
    PageView {
        rows,
        page,
        total_pages: total,
        filtered: count,
    }
}
