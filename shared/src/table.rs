//! Client-side filtering and pagination over the in-memory record list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::Record;
use crate::DEFAULT_PAGE_SIZE;

/// Selected countries. Empty means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    countries: BTreeSet<String>,
}

impl FilterState {
    #[must_use]
    pub fn new<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn toggle(&mut self, country: &str) {
        if !self.countries.remove(country) {
            self.countries.insert(country.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.countries.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    #[must_use]
    pub fn is_selected(&self, country: &str) -> bool {
        self.countries.contains(country)
    }

    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.countries.is_empty() || self.countries.contains(&record.country)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    /// A zero size is bumped to one so slicing stays well defined.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.page_index = 0;
    }

    #[must_use]
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    #[must_use]
    pub const fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    #[must_use]
    pub fn can_next(&self, total: usize) -> bool {
        self.page_index + 1 < self.page_count(total)
    }

    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next(&mut self, total: usize) {
        if self.can_next(total) {
            self.page_index += 1;
        }
    }

    /// Changes the page size and pulls the index back onto the last page
    /// that still exists.
    pub fn set_page_size(&mut self, page_size: usize, total: usize) {
        self.page_size = page_size.max(1);
        let last = self.page_count(total).saturating_sub(1);
        self.page_index = self.page_index.min(last);
    }

    #[must_use]
    pub fn window(&self, total: usize) -> PageWindow {
        if total == 0 {
            return PageWindow::default();
        }
        let start = self.page_index.saturating_mul(self.page_size).saturating_add(1);
        let end = start.saturating_add(self.page_size - 1).min(total);
        PageWindow { start, end, total }
    }
}

/// The 1-based "Showing start - end of total" numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView<'a> {
    pub rows: Vec<&'a Record>,
    pub total_matching: usize,
}

/// Filters `records` in input order and slices out the requested page.
/// An index past the end yields no rows rather than an error.
#[must_use]
pub fn view<'a>(records: &'a [Record], filter: &FilterState, page: &PageState) -> TableView<'a> {
    let matching: Vec<&Record> = records.iter().filter(|r| filter.matches(r)).collect();
    let total_matching = matching.len();
    let rows = matching
        .into_iter()
        .skip(page.page_index.saturating_mul(page.page_size))
        .take(page.page_size)
        .collect();

    TableView {
        rows,
        total_matching,
    }
}
