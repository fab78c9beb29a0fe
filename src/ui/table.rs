use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::TableRow;
use crate::state::AppState;

const HEADERS: [&str; 7] = [
    "country",
    "continent",
    "life_exp",
    "hdi_index",
    "gdp",
    "co2_consump",
    "services",
];

fn cell(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_default()
}

fn row_cells(row: &TableRow) -> [String; 7] {
    [
        row.country.clone(),
        row.continent.to_string(),
        cell(row.life_exp, 1),
        cell(row.hdi_index, 3),
        cell(row.gdp, 0),
        cell(row.co2_consump, 2),
        cell(row.services, 1),
    ]
}

/// Linked rows sorted by life expectancy.
pub fn linked_table(ui: &mut Ui, state: &AppState, height: f32) {
    ui.strong("Selected Countries (Linked)");

    let rows = &state.views.table;
    if rows.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    let text_height = egui::TextStyle::Body.resolve(ui.style()).size;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(height)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0).clip(true), HEADERS.len())
        .header(24.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.label(RichText::new(name).strong().monospace());
                });
            }
        })
        .body(|body| {
            body.rows(text_height + 8.0, rows.len(), |mut row| {
                let cells = row_cells(&rows[row.index()]);
                for value in cells {
                    row.col(|ui| {
                        ui.label(RichText::new(value).monospace().small());
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Continent;

    #[test]
    fn absent_values_render_blank() {
        let row = TableRow {
            country: "Kenya".to_string(),
            continent: Continent::Africa,
            life_exp: Some(66.34),
            hdi_index: None,
            gdp: Some(1710.4),
            co2_consump: None,
            services: Some(48.5),
        };
        assert_eq!(
            row_cells(&row),
            ["Kenya", "Africa", "66.3", "", "1710", "", "48.5"].map(String::from)
        );
    }
}
