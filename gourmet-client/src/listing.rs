//! Client-side paging and search over fetched rows

use shared::PaginatedResponse;
use shared::models::{
    AdminRestaurant, AdminRevenueRow, AdminUser, Branch, DiningTable, MenuItem, StaffBill,
};

/// Page cursor over `total` rows, pages numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: u32,
    page_size: u32,
    total: u64,
}

impl Paginator {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    /// Mirror the cursor the server returned
    pub fn from_response<T>(response: &PaginatedResponse<T>) -> Self {
        let mut paginator = Self::new(response.limit);
        paginator.total = response.total;
        paginator.page = response.page.clamp(1, paginator.last_page());
        paginator
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// `ceil(total / page_size)`; zero when there are no rows
    pub fn total_pages(&self) -> u32 {
        self.total.div_ceil(u64::from(self.page_size)) as u32
    }

    fn last_page(&self) -> u32 {
        self.total_pages().max(1)
    }

    /// Update the row count, pulling the page back if it fell off the end
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
        self.page = self.page.min(self.last_page());
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Returns whether the page moved
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Jump to `page`; out-of-range pages are ignored
    pub fn go_to(&mut self, page: u32) -> bool {
        if page < 1 || page > self.last_page() {
            tracing::debug!(page, last = self.last_page(), "Ignoring out-of-range page");
            return false;
        }
        self.page = page;
        true
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Row offset of the current page
    pub fn offset(&self) -> usize {
        ((self.page - 1) as usize) * self.page_size as usize
    }

    /// 1-based inclusive `(first, last)` rows on this page; `(0, 0)` when empty
    pub fn range(&self) -> (u64, u64) {
        if self.total == 0 {
            return (0, 0);
        }
        let first = self.offset() as u64 + 1;
        let last = (first + u64::from(self.page_size) - 1).min(self.total);
        (first, last)
    }
}

/// Rows that can be found by a free-text search
pub trait Searchable {
    /// Text fields the search looks at
    fn search_fields(&self) -> Vec<&str>;

    /// `needle` must already be lower-cased
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Fetched rows with a search filter and a page cursor
#[derive(Debug, Clone)]
pub struct ListView<T> {
    rows: Vec<T>,
    /// Indices into `rows` that pass the search; `None` when not searching
    hits: Option<Vec<usize>>,
    query: String,
    paginator: Paginator,
}

impl<T: Searchable> ListView<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            hits: None,
            query: String::new(),
            paginator: Paginator::new(page_size),
        }
    }

    /// Replace the rows after a fetch, keeping the search and the page where possible
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.refilter();
        self.paginator.set_total(self.visible_count() as u64);
    }

    /// Filter case-insensitively and go back to page 1
    pub fn search(&mut self, query: &str) {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            self.clear_search();
            return;
        }
        self.query = query;
        self.refilter();
        self.paginator.set_total(self.visible_count() as u64);
        self.paginator.reset();
    }

    /// Show every row again, from page 1
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.hits = None;
        self.paginator.set_total(self.rows.len() as u64);
        self.paginator.reset();
    }

    fn refilter(&mut self) {
        self.hits = if self.query.is_empty() {
            None
        } else {
            Some(
                self.rows
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| row.matches(&self.query))
                    .map(|(i, _)| i)
                    .collect(),
            )
        };
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn visible_count(&self) -> usize {
        self.hits.as_ref().map_or(self.rows.len(), Vec::len)
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn paginator_mut(&mut self) -> &mut Paginator {
        &mut self.paginator
    }

    /// Rows on the current page of the active view
    pub fn page_items(&self) -> Vec<&T> {
        let start = self.paginator.offset();
        let size = self.paginator.page_size() as usize;
        match &self.hits {
            None => self.rows.iter().skip(start).take(size).collect(),
            Some(hits) => hits
                .iter()
                .skip(start)
                .take(size)
                .map(|&i| &self.rows[i])
                .collect(),
        }
    }
}

impl Searchable for AdminUser {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.tenant_name.as_deref());
        fields
    }
}

impl Searchable for AdminRestaurant {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.owner_name.as_deref());
        fields.extend(self.owner_email.as_deref());
        fields
    }
}

impl Searchable for AdminRevenueRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for Branch {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.branch_name.as_str(), self.address.as_str()];
        fields.extend(self.province.as_deref());
        fields.extend(self.manager_name.as_deref());
        fields
    }
}

impl Searchable for DiningTable {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.table_number.as_str(), self.status.as_str()]
    }
}

impl Searchable for MenuItem {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.item_name.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.category_name.as_deref());
        fields
    }
}

impl Searchable for StaffBill {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.table_number.as_str(),
            self.branch_name.as_str(),
            self.order_id.as_str(),
        ]
    }
}
