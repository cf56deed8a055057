use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use super::model::SalesTable;

// ---------------------------------------------------------------------------
// Filter domains: what the selection widgets offer
// ---------------------------------------------------------------------------

/// Selectable values derived from the full table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDomains {
    /// Earliest sale date, `None` for an empty table.
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// Distinct categories in first-seen order.
    pub categories: Vec<String>,
    /// Distinct regions in first-seen order.
    pub regions: Vec<String>,
}

/// Scan the table once and collect the filter domains.
pub fn compute_domains(table: &SalesTable) -> FilterDomains {
    let mut domains = FilterDomains::default();
    let mut seen_categories = HashSet::new();
    let mut seen_regions = HashSet::new();

    for rec in &table.records {
        domains.min_date = Some(domains.min_date.map_or(rec.date, |d| d.min(rec.date)));
        domains.max_date = Some(domains.max_date.map_or(rec.date, |d| d.max(rec.date)));
        if seen_categories.insert(rec.category.as_str()) {
            domains.categories.push(rec.category.clone());
        }
        if seen_regions.insert(rec.region.as_str()) {
            domains.regions.push(rec.region.clone());
        }
    }
    domains
}

// ---------------------------------------------------------------------------
// Filter selection: the user's current choice
// ---------------------------------------------------------------------------

/// Inclusive calendar date bounds. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One session's filter choice. Hashable so it can key the export cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub date_range: DateRange,
    pub categories: BTreeSet<String>,
    pub regions: BTreeSet<String>,
}

impl FilterSelection {
    /// Everything selected: full date range, all categories, all regions.
    /// An empty table gets today's date as both bounds.
    pub fn all(domains: &FilterDomains) -> Self {
        let fallback = chrono::Local::now().date_naive();
        FilterSelection {
            date_range: DateRange::new(
                domains.min_date.unwrap_or(fallback),
                domains.max_date.unwrap_or(fallback),
            ),
            categories: domains.categories.iter().cloned().collect(),
            regions: domains.regions.iter().cloned().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Applying the selection
// ---------------------------------------------------------------------------

/// Return indices of rows passing all three predicates, in source order.
///
/// A row passes when:
/// * its date lies inside the inclusive date range
/// * its category is in the selected category set
/// * its region is in the selected region set
///
/// An empty category or region set therefore matches nothing.
pub fn matching_indices(table: &SalesTable, selection: &FilterSelection) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            selection.date_range.contains(rec.date)
                && selection.categories.contains(&rec.category)
                && selection.regions.contains(&rec.region)
        })
        .map(|(i, _)| i)
        .collect()
}

/// The filtered view: a table with the matching rows in source order.
pub fn apply_filter(table: &SalesTable, selection: &FilterSelection) -> SalesTable {
    table.subset(&matching_indices(table, selection))
}
