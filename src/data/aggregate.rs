use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use super::model::SalesTable;

/// Shown in place of the top category when there are no rows.
pub const EMPTY_PLACEHOLDER: &str = "N/A";

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// The four key figures displayed above the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub total_revenue: f64,
    pub order_count: usize,
    /// Most frequent category; `None` for an empty view.
    pub top_category: Option<String>,
    pub region_count: usize,
}

impl SummaryMetrics {
    pub fn top_category_label(&self) -> &str {
        self.top_category.as_deref().unwrap_or(EMPTY_PLACEHOLDER)
    }
}

/// Compute the summary metrics of a (filtered) table.
///
/// The top category is the one with the most rows; among tied categories
/// the one seen first in row order wins.
pub fn compute_metrics(table: &SalesTable) -> SummaryMetrics {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut regions: HashSet<&str> = HashSet::new();
    let mut total_revenue = 0.0;

    for rec in &table.records {
        total_revenue += rec.total_sale;
        let count = counts.entry(rec.category.as_str()).or_insert_with(|| {
            order.push(rec.category.as_str());
            0
        });
        *count += 1;
        regions.insert(rec.region.as_str());
    }

    let mut top: Option<(&str, usize)> = None;
    for cat in order {
        let n = counts[cat];
        if top.map_or(true, |(_, best)| n > best) {
            top = Some((cat, n));
        }
    }

    SummaryMetrics {
        total_revenue,
        order_count: table.len(),
        top_category: top.map(|(cat, _)| cat.to_string()),
        region_count: regions.len(),
    }
}

// ---------------------------------------------------------------------------
// Grouped series for the charts
// ---------------------------------------------------------------------------

/// Revenue per category, one entry per category in first-seen order.
pub fn revenue_by_category(table: &SalesTable) -> Vec<(String, f64)> {
    let mut series: Vec<(String, f64)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for rec in &table.records {
        match slot.get(rec.category.as_str()) {
            Some(&i) => series[i].1 += rec.total_sale,
            None => {
                slot.insert(rec.category.as_str(), series.len());
                series.push((rec.category.clone(), rec.total_sale));
            }
        }
    }
    series
}

/// Revenue per day, sorted by ascending date.
pub fn revenue_by_date(table: &SalesTable) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for rec in &table.records {
        *by_date.entry(rec.date).or_insert(0.0) += rec.total_sale;
    }
    by_date.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// Format an amount as rupees with thousands separators: `₹ 1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("₹ {sign}{grouped}.{frac_part}")
}
