use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::export::EXPORT_FILE_NAME;
use crate::state::{AppState, FilterColumn};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date range");
            let mut start = state.selection.date_range.start;
            let mut end = state.selection.date_range.end;
            let mut changed = false;
            egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("From");
                changed |= ui.add(DatePickerButton::new(&mut start).id_salt("date_start")).changed();
                ui.end_row();
                ui.label("To");
                changed |= ui.add(DatePickerButton::new(&mut end).id_salt("date_end")).changed();
                ui.end_row();
            });
            if changed {
                state.set_date_range(start, end);
            }
            if start > end {
                ui.label(RichText::new("Start date is after end date.").color(Color32::YELLOW));
            }
            ui.separator();

            membership_filter(ui, state, FilterColumn::Category);
            membership_filter(ui, state, FilterColumn::Region);

            ui.separator();
            ui.label(
                RichText::new("Use the filters above to explore your sales data interactively.")
                    .italics()
                    .weak(),
            );
        });
}

/// Checkbox list with All / None buttons for one membership filter.
fn membership_filter(ui: &mut Ui, state: &mut AppState, column: FilterColumn) {
    let (title, values) = match column {
        FilterColumn::Category => ("Categories", state.domains.categories.clone()),
        FilterColumn::Region => ("Regions", state.domains.regions.clone()),
    };
    let n_selected = match column {
        FilterColumn::Category => state.selection.categories.len(),
        FilterColumn::Region => state.selection.regions.len(),
    };
    let header_text = format!("{title}  ({n_selected}/{})", values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for value in &values {
                let (mut checked, text) = match column {
                    FilterColumn::Category => (
                        state.selection.categories.contains(value),
                        RichText::new(value).color(state.color_map.color_for(value)),
                    ),
                    FilterColumn::Region => (
                        state.selection.regions.contains(value),
                        RichText::new(value),
                    ),
                };
                if ui.checkbox(&mut checked, text).changed() {
                    match column {
                        FilterColumn::Category => state.toggle_category(value),
                        FilterColumn::Region => state.toggle_region(value),
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let file_name = state
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ui.label(format!(
            "{file_name}: {} orders loaded, {} matching",
            state.dataset.len(),
            state.view.filtered.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Export button, or a notice when there is nothing to export.
pub fn export_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Download Filtered Data");
    if state.view.csv.is_none() {
        ui.label("No data available to download. Please adjust your filters.");
        return;
    }
    if ui.button("Export as CSV").clicked() {
        save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let loaded = crate::data::loader::load_file(&path)
            .and_then(|dataset| state.set_dataset(dataset, path.clone()));
        if let Err(e) = loaded {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
