use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon};

use crate::color::density_color;
use crate::data::model::Continent;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Scatter (primary chart, drives the linking)
// ---------------------------------------------------------------------------

/// Drag state of the box selection; lives across frames.
#[derive(Debug, Default)]
pub struct ScatterBrush {
    start: Option<PlotPoint>,
}

fn format_gdp(gdp: f64) -> String {
    if gdp >= 1000.0 {
        format!("{:.0}k", gdp / 1000.0)
    } else {
        format!("{gdp:.0}")
    }
}

fn brush_rect(a: PlotPoint, b: PlotPoint) -> Vec<[f64; 2]> {
    vec![[a.x, a.y], [b.x, a.y], [b.x, b.y], [a.x, b.y]]
}

fn ordered(a: f64, b: f64) -> RangeInclusive<f64> {
    a.min(b)..=a.max(b)
}

/// GDP (log10 x axis) against life expectancy, marker size from CO₂.
///
/// Drag with the primary button to box-select countries; double-click
/// clears the selection.
pub fn scatter_chart(ui: &mut Ui, state: &mut AppState, brush: &mut ScatterBrush, height: f32) {
    let year = state.filter.as_ref().map(|f| f.year).unwrap_or_default();
    ui.strong(format!("GDP vs Life Expectancy ({year}): drag a box to link"));

    let points = &state.views.scatter;
    let selected = state
        .filter
        .as_ref()
        .map(|f| f.selected_countries.clone())
        .unwrap_or_default();
    let max_co2 = points
        .iter()
        .filter_map(|p| p.co2_consump)
        .fold(0.0_f64, f64::max);

    let hover: Vec<(f64, f64, String)> = points
        .iter()
        .map(|p| (p.gdp.log10(), p.life_exp, p.country.clone()))
        .collect();

    let response = Plot::new("scatter_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("GDP per capita (log scale)")
        .y_axis_label("Life expectancy")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            format_gdp(10f64.powf(mark.value))
        })
        .label_formatter(move |name, value| {
            if name.is_empty() {
                return String::new();
            }
            let nearest = hover.iter().min_by(|a, b| {
                let da = (a.0 - value.x).powi(2) + ((a.1 - value.y) / 10.0).powi(2);
                let db = (b.0 - value.x).powi(2) + ((b.1 - value.y) / 10.0).powi(2);
                da.total_cmp(&db)
            });
            match nearest {
                Some((x, y, country)) => {
                    format!("{country} ({name})\nGDP {}\nLife exp {y:.1}", format_gdp(10f64.powf(*x)))
                }
                None => name.to_string(),
            }
        })
        .allow_drag(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            for p in points {
                let base = state.palette.color_for(p.continent);
                let dimmed = !selected.is_empty() && !selected.contains(&p.country);
                let color = if dimmed { base.gamma_multiply(0.25) } else { base };
                let radius = match p.co2_consump {
                    Some(co2) if max_co2 > 0.0 => 2.5 + 10.0 * (co2.max(0.0) / max_co2).sqrt() as f32,
                    _ => 2.5,
                };
                plot_ui.points(
                    Points::new(vec![[p.gdp.log10(), p.life_exp]])
                        .name(p.continent.as_str())
                        .color(color)
                        .filled(true)
                        .radius(radius),
                );
            }

            let pointer = plot_ui.pointer_coordinate();
            let drag = plot_ui.response().clone();
            if drag.drag_started() {
                brush.start = pointer;
            }
            if let (Some(start), Some(end)) = (brush.start, pointer) {
                if drag.dragged() || drag.drag_stopped() {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(brush_rect(start, end)))
                            .fill_color(Color32::from_rgba_unmultiplied(100, 100, 100, 40))
                            .stroke(Stroke::new(1.0, Color32::DARK_GRAY)),
                    );
                }
            }
            if drag.drag_stopped() {
                return brush.start.take().zip(pointer);
            }
            None
        });

    if let Some((a, b)) = response.inner {
        let gdp = ordered(10f64.powf(a.x), 10f64.powf(b.x));
        let life_exp = ordered(a.y, b.y);
        state.select_box(gdp, life_exp);
    } else if response.response.double_clicked() {
        state.clear_selection();
    }
}

// ---------------------------------------------------------------------------
// Linked charts
// ---------------------------------------------------------------------------

/// Mean life expectancy per year, one line per continent.
pub fn time_series_chart(ui: &mut Ui, state: &AppState, height: f32) {
    ui.strong("Average Life Expectancy Over Time (by continent)");

    let mut lines: BTreeMap<Continent, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &state.views.time_series {
        lines
            .entry(p.continent)
            .or_default()
            .push([p.year as f64, p.mean_life_exp]);
    }

    Plot::new("time_series_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Life expectancy")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| format!("{:.0}", mark.value))
        .show(ui, |plot_ui| {
            for (continent, series) in lines {
                plot_ui.line(
                    Line::new(PlotPoints::from(series))
                        .name(continent.as_str())
                        .color(state.palette.color_for(continent))
                        .width(2.0),
                );
            }
        });
}

/// Mean life expectancy per continent for the linked rows, highest first.
pub fn continent_bar_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let year = state.filter.as_ref().map(|f| f.year).unwrap_or_default();
    ui.strong(format!("Avg Life Expectancy by Continent ({year})"));

    let labels: Vec<String> = state
        .views
        .continent_means
        .iter()
        .map(|m| m.continent.to_string())
        .collect();

    Plot::new("continent_bar_plot")
        .height(height)
        .legend(Legend::default())
        .y_axis_label("Life expectancy")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, mean) in state.views.continent_means.iter().enumerate() {
                let color = state.palette.color_for(mean.continent);
                let bar = Bar::new(i as f64, mean.mean_life_exp)
                    .name(format!("{} (n={})", mean.continent, mean.count))
                    .fill(color)
                    .width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(mean.continent.as_str())
                        .color(color),
                );
            }
        });
}

/// HDI against life expectancy as a 2D density.
pub fn density_heatmap(ui: &mut Ui, state: &AppState, height: f32) {
    ui.strong("HDI vs Life Expectancy (density)");

    let Some(grid) = &state.views.density else {
        ui.label("No rows with HDI in the current view.");
        return;
    };

    Plot::new("density_plot")
        .height(height)
        .x_axis_label("HDI")
        .y_axis_label("Life expectancy")
        .show(ui, |plot_ui| {
            for (ix, column) in grid.counts.iter().enumerate() {
                for (iy, &count) in column.iter().enumerate() {
                    if count == 0 {
                        continue;
                    }
                    let t = count as f32 / grid.max_count.max(1) as f32;
                    let color = density_color(t);
                    let (x0, x1) = (grid.x_edges[ix], grid.x_edges[ix + 1]);
                    let (y0, y1) = (grid.y_edges[iy], grid.y_edges[iy + 1]);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]))
                            .name(format!("count {count}"))
                            .fill_color(color)
                            .stroke(Stroke::NONE),
                    );
                }
            }
        });
}
