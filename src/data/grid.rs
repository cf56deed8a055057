use std::ops::Range;

use super::model::SalesTable;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

impl SortKey {
    /// Next sort state after clicking `column`'s header:
    /// ascending → descending → unsorted, restarting on a new column.
    pub fn toggle(current: Option<SortKey>, column: usize) -> Option<SortKey> {
        match current {
            Some(SortKey { column: c, direction: SortDirection::Ascending }) if c == column => {
                Some(SortKey { column, direction: SortDirection::Descending })
            }
            Some(SortKey { column: c, direction: SortDirection::Descending }) if c == column => None,
            _ => Some(SortKey { column, direction: SortDirection::Ascending }),
        }
    }
}

// ---------------------------------------------------------------------------
// Grid query: search + sort over the filtered view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridQuery {
    /// Case-insensitive substring matched against every cell.
    pub search: String,
    pub sort: Option<SortKey>,
}

/// Row indices of `table` to show in the grid, in display order.
pub fn visible_rows(table: &SalesTable, query: &GridQuery) -> Vec<usize> {
    let needle = query.search.trim().to_lowercase();
    let mut rows: Vec<usize> = table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            needle.is_empty()
                || rec
                    .cells
                    .iter()
                    .any(|cell| cell.to_string().to_lowercase().contains(&needle))
        })
        .map(|(i, _)| i)
        .collect();

    if let Some(key) = query.sort {
        if key.column < table.columns.len() {
            // Stable sort: equal keys keep source order in both directions.
            rows.sort_by(|&a, &b| {
                let ord = table.records[a].cells[key.column].cmp(&table.records[b].cells[key.column]);
                match key.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Pagination {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Number of pages for `total` rows; at least one.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Clamp the current page so it stays inside `total` rows.
    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.min(self.page_count(total) - 1);
    }

    /// Positions (into the visible rows) shown on the current page.
    pub fn page_range(&self, total: usize) -> Range<usize> {
        let page = self.page.min(self.page_count(total) - 1);
        let start = (page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }
}
