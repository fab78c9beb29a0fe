use super::aggregate::{
    continent_means, density_bins, scatter_points, table_rows, time_series, ContinentMean,
    DensityGrid, ScatterPoint, TableRow, TimeSeriesPoint,
};
use super::filter::{linked_view, scatter_view, year_view, FilterState};
use super::model::RecordSet;

/// Tunables for the aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub nbins_x: usize,
    pub nbins_y: usize,
    /// Table rows shown while nothing is selected.
    pub table_limit: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            nbins_x: 20,
            nbins_y: 20,
            table_limit: 15,
        }
    }
}

/// Everything the presentation layer draws for one [`FilterState`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardViews {
    pub scatter: Vec<ScatterPoint>,
    pub time_series: Vec<TimeSeriesPoint>,
    pub continent_means: Vec<ContinentMean>,
    pub density: Option<DensityGrid>,
    pub table: Vec<TableRow>,
    /// Rows matching year and continents.
    pub year_rows: usize,
    /// Rows left after applying the scatter selection.
    pub linked_rows: usize,
}

impl DashboardViews {
    /// Run filters and aggregators in one pass.  Pure: the dataset is only
    /// read.
    pub fn compute(dataset: &RecordSet, filter: &FilterState, settings: &ViewSettings) -> Self {
        let records = dataset.records();

        let scatter = scatter_view(records, filter.year, &filter.continents);
        let year_filtered = year_view(records, filter.year, &filter.continents);
        let linked = linked_view(&year_filtered, &filter.selected_countries);

        let views = DashboardViews {
            scatter: scatter_points(&scatter),
            time_series: time_series(records, &filter.continents),
            continent_means: continent_means(&linked),
            density: density_bins(&linked, settings.nbins_x, settings.nbins_y),
            table: table_rows(&linked, filter.has_selection(), settings.table_limit),
            year_rows: year_filtered.len(),
            linked_rows: linked.len(),
        };

        log::debug!(
            "Recomputed views for {} ({} continents, {} selected): {} scatter points, {} linked rows",
            filter.year,
            filter.continents.len(),
            filter.selected_countries.len(),
            views.scatter.len(),
            views.linked_rows
        );
        views
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::{Continent, Record};

    fn dataset() -> RecordSet {
        let mut rows: Vec<Record> = vec![
            record("A", Continent::Africa, 2018, Some(50.0), Some(1000.0)),
            record("B", Continent::Asia, 2018, Some(70.0), Some(2000.0)),
            record("C", Continent::Asia, 2017, Some(65.0), Some(500.0)),
        ];
        rows[1].hdi_index = Some(0.7);
        RecordSet::from_records(rows)
    }

    fn filter(continents: &[Continent], selected: &[&str]) -> FilterState {
        FilterState {
            year: 2018,
            continents: continents.iter().copied().collect(),
            selected_countries: selected.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn full_pass_without_selection() {
        let data = dataset();
        let views = DashboardViews::compute(
            &data,
            &filter(&[Continent::Africa, Continent::Asia], &[]),
            &ViewSettings::default(),
        );

        let scatter: Vec<&str> = views.scatter.iter().map(|p| p.country.as_str()).collect();
        assert_eq!(scatter, vec!["A", "B"]);
        assert_eq!(views.year_rows, 2);
        assert_eq!(views.linked_rows, 2);
        // The time series ignores the selected year.
        assert_eq!(views.time_series.len(), 3);
        assert_eq!(views.continent_means[0].continent, Continent::Asia);
        assert_eq!(views.table.len(), 2);
        assert_eq!(views.density.as_ref().map(|d| d.total), Some(1));
    }

    #[test]
    fn selection_links_every_view() {
        let data = dataset();
        let views = DashboardViews::compute(
            &data,
            &filter(&[Continent::Africa, Continent::Asia], &["B"]),
            &ViewSettings::default(),
        );

        assert_eq!(views.linked_rows, 1);
        assert_eq!(
            views.continent_means,
            vec![ContinentMean { continent: Continent::Asia, mean_life_exp: 70.0, count: 1 }]
        );
        let table: Vec<&str> = views.table.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(table, vec!["B"]);
        // The scatter itself stays unfiltered so the selection can be changed.
        assert_eq!(views.scatter.len(), 2);
    }

    #[test]
    fn unmatched_continent_empties_every_view() {
        let data = dataset();
        let views = DashboardViews::compute(
            &data,
            &filter(&[Continent::Europe], &[]),
            &ViewSettings::default(),
        );
        assert!(views.scatter.is_empty());
        assert!(views.time_series.is_empty());
        assert!(views.continent_means.is_empty());
        assert!(views.density.is_none());
        assert!(views.table.is_empty());
    }

    #[test]
    fn compute_leaves_dataset_untouched() {
        let data = dataset();
        let before = data.clone();
        let state = FilterState {
            year: 2017,
            continents: BTreeSet::from(Continent::ALL),
            selected_countries: BTreeSet::from(["C".to_string()]),
        };
        let first = DashboardViews::compute(&data, &state, &ViewSettings::default());
        let second = DashboardViews::compute(&data, &state, &ViewSettings::default());
        assert_eq!(first, second);
        assert_eq!(data, before);
    }
}
