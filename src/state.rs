use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::data::export::{write_export, ExportCache};
use crate::data::filter::{compute_domains, DateRange, FilterDomains, FilterSelection};
use crate::data::grid::{GridQuery, Pagination};
use crate::data::model::SalesTable;
use crate::data::pipeline::{recompute, DashboardView};

/// Which membership filter a bulk action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Category,
    Region,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, read-only once loaded.
    pub dataset: Arc<SalesTable>,

    /// File the dataset came from.
    pub source: PathBuf,

    /// Selectable values of the loaded dataset.
    pub domains: FilterDomains,

    /// Current filter choice.
    pub selection: FilterSelection,

    /// Derived values for the current selection.
    pub view: DashboardView,

    /// CSV encodings per selection for the loaded dataset.
    pub exports: ExportCache,

    /// Grid search and sort.
    pub grid: GridQuery,

    pub pagination: Pagination,

    /// Category colours for the bar chart.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state for a freshly loaded dataset with everything selected.
    pub fn new(dataset: SalesTable, source: PathBuf, page_size: usize) -> Result<Self> {
        let dataset = Arc::new(dataset);
        let domains = compute_domains(&dataset);
        let selection = FilterSelection::all(&domains);
        let mut exports = ExportCache::default();
        let view = recompute(&dataset, &selection, &mut exports)?;

        Ok(Self {
            color_map: ColorMap::new(&domains.categories),
            dataset,
            source,
            domains,
            selection,
            view,
            exports,
            grid: GridQuery::default(),
            pagination: Pagination::new(page_size),
            status_message: None,
        })
    }

    /// Replace the dataset, resetting filters and dropping cached exports.
    ///
    /// On error the current dataset and everything derived from it stay.
    pub fn set_dataset(&mut self, dataset: SalesTable, source: PathBuf) -> Result<()> {
        let dataset = Arc::new(dataset);
        let domains = compute_domains(&dataset);
        let selection = FilterSelection::all(&domains);
        let mut exports = ExportCache::default();
        let view = recompute(&dataset, &selection, &mut exports)?;

        self.color_map = ColorMap::new(&domains.categories);
        self.dataset = dataset;
        self.source = source;
        self.domains = domains;
        self.selection = selection;
        self.view = view;
        self.exports = exports;
        self.grid = GridQuery::default();
        self.pagination.page = 0;
        self.status_message = None;
        Ok(())
    }

    /// Recompute the dashboard view after a filter change.
    pub fn refresh(&mut self) {
        match recompute(&self.dataset, &self.selection, &mut self.exports) {
            Ok(view) => {
                self.view = view;
                self.pagination.page = 0;
            }
            Err(e) => {
                log::error!("Failed to recompute dashboard: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.selection.date_range = DateRange::new(start, end);
        self.refresh();
    }

    /// Toggle a single category in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.selection.categories, category);
        self.refresh();
    }

    /// Toggle a single region in the selection.
    pub fn toggle_region(&mut self, region: &str) {
        toggle(&mut self.selection.regions, region);
        self.refresh();
    }

    /// Select every value of a column.
    pub fn select_all(&mut self, column: FilterColumn) {
        match column {
            FilterColumn::Category => {
                self.selection.categories = self.domains.categories.iter().cloned().collect()
            }
            FilterColumn::Region => {
                self.selection.regions = self.domains.regions.iter().cloned().collect()
            }
        }
        self.refresh();
    }

    /// Deselect every value of a column.
    pub fn select_none(&mut self, column: FilterColumn) {
        match column {
            FilterColumn::Category => self.selection.categories.clear(),
            FilterColumn::Region => self.selection.regions.clear(),
        }
        self.refresh();
    }

    /// Write the current export to `path`. Fails when the view is empty.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        let bytes = self
            .view
            .csv
            .as_ref()
            .context("no data available to export")?;
        write_export(path, bytes)?;
        self.status_message = None;
        Ok(())
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, scenario_table, table};

    fn state() -> AppState {
        AppState::new(scenario_table(), PathBuf::from("sales.csv"), 20).expect("state")
    }

    #[test]
    fn starts_with_everything_selected() {
        let s = state();
        assert_eq!(s.view.filtered.len(), 3);
        assert_eq!(s.selection.date_range, DateRange::new(date(2024, 1, 1), date(2024, 1, 3)));
        assert_eq!(s.exports.len(), 1);
    }

    #[test]
    fn toggles_recompute_view() {
        let mut s = state();
        s.toggle_category("Clothing");
        s.toggle_region("South");
        assert_eq!(s.view.metrics.total_revenue, 175.0);
        assert_eq!(s.view.metrics.order_count, 2);

        s.toggle_category("Clothing");
        assert!(s.selection.categories.contains("Clothing"));
        assert_eq!(s.view.metrics.order_count, 2);
    }

    #[test]
    fn select_none_then_all() {
        let mut s = state();
        s.select_none(FilterColumn::Region);
        assert!(s.view.filtered.is_empty());
        assert!(s.view.csv.is_none());
        assert_eq!(s.view.metrics.top_category_label(), "N/A");

        s.select_all(FilterColumn::Region);
        assert_eq!(s.view.filtered.len(), 3);
    }

    #[test]
    fn inverted_date_range_empties_view() {
        let mut s = state();
        s.set_date_range(date(2024, 1, 5), date(2024, 1, 1));
        assert!(s.view.filtered.is_empty());
    }

    #[test]
    fn export_writes_current_view() {
        let mut s = state();
        s.toggle_category("Clothing");
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");

        s.export_to(&path).expect("export");
        let text = std::fs::read_to_string(&path).expect("read export");
        assert_eq!(text.lines().count(), 3);
        assert!(!text.contains("Clothing"));
    }

    #[test]
    fn export_of_empty_view_fails() {
        let mut s = state();
        s.select_none(FilterColumn::Category);
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(s.export_to(&dir.path().join("out.csv")).is_err());
    }

    #[test]
    fn set_dataset_resets_filters_and_cache() {
        let mut s = state();
        s.select_none(FilterColumn::Category);
        s.toggle_category("Electronics");

        let other = table(&[(date(2023, 6, 1), "Books", "West", 9.0)]);
        s.set_dataset(other, PathBuf::from("other.csv")).expect("set dataset");
        assert_eq!(s.domains.categories, vec!["Books"]);
        assert_eq!(s.view.filtered.len(), 1);
        assert_eq!(s.exports.len(), 1);
        assert_eq!(s.source, PathBuf::from("other.csv"));
    }

    #[test]
    fn failed_dataset_switch_keeps_current_state() {
        let mut s = state();
        s.toggle_category("Clothing");
        // A row with fewer cells than columns cannot be encoded.
        let mut broken = table(&[(date(2023, 6, 1), "Books", "West", 9.0)]);
        broken.records[0].cells.pop();

        assert!(s.set_dataset(broken, PathBuf::from("broken.csv")).is_err());
        assert_eq!(s.source, PathBuf::from("sales.csv"));
        assert_eq!(s.dataset.len(), 3);
        assert_eq!(s.domains.categories, vec!["Electronics", "Clothing"]);
        assert!(!s.selection.categories.contains("Clothing"));
        assert_eq!(s.view.filtered.len(), 2);
        assert_eq!(s.view.metrics.total_revenue, 175.0);
        assert_eq!(s.color_map.color_for("Books"), s.color_map.color_for("Unknown"));
        assert_eq!(s.exports.len(), 2);
    }
}
