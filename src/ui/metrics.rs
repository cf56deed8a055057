use eframe::egui::{self, RichText, Ui};

use crate::data::aggregate::{format_currency, SummaryMetrics};

/// Four metric cards side by side.
pub fn metric_cards(ui: &mut Ui, metrics: &SummaryMetrics) {
    ui.heading("Key Metrics");
    ui.columns(4, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Total Revenue", format_currency(metrics.total_revenue));
        metric_card(&mut cols[1], "Total Orders", metrics.order_count.to_string());
        metric_card(&mut cols[2], "Top Category", metrics.top_category_label().to_string());
        metric_card(&mut cols[3], "Regions", metrics.region_count.to_string());
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(22.0).strong());
    });
}
