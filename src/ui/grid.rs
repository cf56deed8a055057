use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::grid::{visible_rows, SortDirection, SortKey};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Sales grid (central panel)
// ---------------------------------------------------------------------------

/// Searchable, sortable, paginated grid over the filtered view.
pub fn sales_grid(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sales Data");

    if state.view.filtered.is_empty() {
        ui.label(
            RichText::new("No data to display. Please adjust filters.").color(Color32::YELLOW),
        );
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search");
        if ui.text_edit_singleline(&mut state.grid.search).changed() {
            state.pagination.page = 0;
        }
    });

    let table = &state.view.filtered;
    let rows = visible_rows(table, &state.grid);
    state.pagination.clamp(rows.len());
    let page_rows = &rows[state.pagination.page_range(rows.len())];
    let sort = state.grid.sort;
    let mut clicked: Option<usize> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(80.0), table.columns.len())
        .header(22.0, |mut header| {
            for (i, name) in table.columns.iter().enumerate() {
                header.col(|ui: &mut Ui| {
                    let marker = match sort {
                        Some(SortKey { column, direction: SortDirection::Ascending }) if column == i => " ▲",
                        Some(SortKey { column, direction: SortDirection::Descending }) if column == i => " ▼",
                        _ => "",
                    };
                    if ui
                        .add(egui::Button::new(RichText::new(format!("{name}{marker}")).strong()).frame(false))
                        .clicked()
                    {
                        clicked = Some(i);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(18.0, page_rows.len(), |mut row| {
                let rec = &table.records[page_rows[row.index()]];
                for cell in &rec.cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });

    let total = rows.len();
    if let Some(column) = clicked {
        state.grid.sort = SortKey::toggle(sort, column);
    }

    // ---- Pagination controls ----
    let page_count = state.pagination.page_count(total);
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(state.pagination.page > 0, egui::Button::new("◀"))
            .clicked()
        {
            state.pagination.page -= 1;
        }
        ui.label(format!(
            "Page {} of {page_count}  ({total} rows)",
            state.pagination.page + 1
        ));
        if ui
            .add_enabled(state.pagination.page + 1 < page_count, egui::Button::new("▶"))
            .clicked()
        {
            state.pagination.page += 1;
        }
    });
}
