use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(dataset), Some(filter)) = (state.dataset.clone(), state.filter.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year ----
            if let Some((first, last)) = dataset.year_range() {
                ui.strong("Year");
                let mut year = filter.year;
                let slider = egui::Slider::new(&mut year, first..=last).step_by(1.0);
                if ui.add(slider).changed() {
                    state.set_year(year);
                }
                ui.separator();
            }

            // ---- Continents ----
            let n_selected = filter.continents.len();
            let n_total = dataset.continents().len();
            ui.strong(format!("Continents  ({n_selected}/{n_total})"));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_continents();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_continents();
                }
            });
            for &continent in dataset.continents() {
                let mut checked = filter.continents.contains(&continent);
                let text = RichText::new(continent.as_str()).color(state.palette.color_for(continent));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_continent(continent);
                }
            }
            ui.label(RichText::new("Oceania = Australia & New Zealand").small().weak());
            ui.separator();

            // ---- Linked selection ----
            ui.strong("Selection");
            if filter.has_selection() {
                ui.label(
                    RichText::new(format!(
                        "Linked selection: {} countries",
                        filter.selected_countries.len()
                    ))
                    .color(Color32::DARK_GREEN),
                );
                if ui.button("Clear selection").clicked() {
                    state.clear_selection();
                }
            } else {
                ui.label("Drag a box on the scatter to link the other views.");
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

        if let (Some(ds), Some(source)) = (&state.dataset, &state.source) {
            ui.label(format!(
                "{}: {} rows loaded, {} in view, {} linked",
                source.display(),
                ds.len(),
                state.views.year_rows,
                state.views.linked_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open indicator data")
        .add_filter("Supported files", &["csv", "tsv", "tab", "json", "parquet", "pq"])
        .add_filter("Delimited text", &["csv", "tsv", "tab"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
