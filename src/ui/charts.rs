use chrono::{Datelike, NaiveDate};
use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::data::aggregate::format_currency;
use crate::data::model::DATE_FORMAT;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Bar chart: revenue by category
// ---------------------------------------------------------------------------

/// One bar per category, coloured by the category's fixed colour.
pub fn category_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Total Sales by Category");
    let series = &state.view.by_category;
    if series.is_empty() {
        ui.label(RichText::new("No sales in the current selection.").weak());
        return;
    }

    let labels: Vec<String> = series.iter().map(|(cat, _)| cat.clone()).collect();

    Plot::new("revenue_by_category")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Total Revenue")
        .x_axis_formatter(move |mark: GridMark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            labels.get(slot as usize).cloned().unwrap_or_default()
        })
        .label_formatter(|name, value| format!("{name}\n{}", format_currency(value.y)))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (category, revenue)) in series.iter().enumerate() {
                let chart = BarChart::new(vec![Bar::new(i as f64, *revenue).width(0.6)])
                    .name(category)
                    .color(state.color_map.color_for(category));
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Line chart: revenue over time
// ---------------------------------------------------------------------------

/// Daily revenue as a line, x axis in days.
pub fn trend_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Sales Trend Over Time");
    let series = &state.view.by_date;
    if series.is_empty() {
        ui.label(RichText::new("No sales in the current selection.").weak());
        return;
    }

    let coords: Vec<[f64; 2]> = series
        .iter()
        .map(|(date, revenue)| [date_to_x(*date), *revenue])
        .collect();

    Plot::new("revenue_over_time")
        .height(CHART_HEIGHT)
        .x_axis_label("Date")
        .y_axis_label("Total Revenue")
        .x_axis_formatter(|mark: GridMark, _range| x_to_label(mark.value))
        .label_formatter(|_name, value| {
            format!("{}\n{}", x_to_label(value.x), format_currency(value.y))
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name("Revenue")
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(coords)).radius(2.5));
        });
}

/// Plot x coordinate of a date: days since the common era.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Axis label for an x coordinate, empty between whole days.
fn x_to_label(x: f64) -> String {
    let day = x.round();
    if (x - day).abs() > 1e-6 {
        return String::new();
    }
    NaiveDate::from_num_days_from_ce_opt(day as i32)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
