use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;

use super::aggregate::{compute_metrics, revenue_by_category, revenue_by_date, SummaryMetrics};
use super::export::ExportCache;
use super::filter::{apply_filter, FilterSelection};
use super::model::SalesTable;

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub filtered: SalesTable,
    pub metrics: SummaryMetrics,
    pub by_category: Vec<(String, f64)>,
    pub by_date: Vec<(NaiveDate, f64)>,
    /// Encoded export; `None` when the view is empty and export is disabled.
    pub csv: Option<Arc<[u8]>>,
}

/// Rebuild every derived value from the source table and a selection.
///
/// Apart from `exports`, which memoizes CSV encodings, nothing is carried
/// between calls.
pub fn recompute(
    table: &SalesTable,
    selection: &FilterSelection,
    exports: &mut ExportCache,
) -> Result<DashboardView> {
    let filtered = apply_filter(table, selection);
    let metrics = compute_metrics(&filtered);
    let by_category = revenue_by_category(&filtered);
    let by_date = revenue_by_date(&filtered);
    let csv = if filtered.is_empty() {
        None
    } else {
        Some(exports.get_or_encode(selection, &filtered)?)
    };

    log::debug!(
        "recomputed dashboard: {} of {} rows, revenue {:.2}, {} cached exports",
        filtered.len(),
        table.len(),
        metrics.total_revenue,
        exports.len()
    );

    Ok(DashboardView {
        filtered,
        metrics,
        by_category,
        by_date,
        csv,
    })
}
