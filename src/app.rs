use eframe::egui::{self, RichText, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::charts::{self, ScatterBrush};
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    brush: ScatterBrush,
}

impl DashboardApp {
    /// Build the app and load the configured dataset.  A load failure is
    /// shown in the window instead of charts.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config.view_settings());
        state.open(&config.data_path);
        Self {
            state,
            brush: ScatterBrush::default(),
        }
    }
}

fn header(ui: &mut Ui) {
    ui.heading(RichText::new("Global Development Trends").size(28.0));
    ui.label("Life expectancy, HDI, GDP, CO₂ consumption, services share");
    ui.add_space(6.0);
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts + table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    let msg = self
                        .state
                        .status_message
                        .clone()
                        .unwrap_or_else(|| "Open a file to view indicators  (File → Open…)".into());
                    ui.heading(msg);
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    header(ui);
                    let chart_height = (ui.available_height() * 0.4).max(260.0);

                    charts::scatter_chart(ui, &mut self.state, &mut self.brush, chart_height);
                    ui.separator();

                    let state = &self.state;
                    ui.columns(2, |cols| {
                        charts::time_series_chart(&mut cols[0], state, chart_height);
                        charts::continent_bar_chart(&mut cols[1], state, chart_height);
                    });
                    ui.separator();
                    ui.columns(2, |cols| {
                        charts::density_heatmap(&mut cols[0], state, chart_height);
                        table::linked_table(&mut cols[1], state, chart_height);
                    });
                });
        });
    }
}
