use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::model::{Continent, Record};

// ---------------------------------------------------------------------------
// Chart-ready shapes
// ---------------------------------------------------------------------------

/// One marker on the GDP / life-expectancy scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub country: String,
    pub continent: Continent,
    pub gdp: f64,
    pub life_exp: f64,
    /// Marker size; `None` draws the smallest marker.
    pub co2_consump: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub year: i32,
    pub continent: Continent,
    pub mean_life_exp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinentMean {
    pub continent: Continent,
    pub mean_life_exp: f64,
    /// Rows that contributed a present `life_exp`.
    pub count: usize,
}

/// Projection shown in the data table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub country: String,
    pub continent: Continent,
    pub life_exp: Option<f64>,
    pub hdi_index: Option<f64>,
    pub gdp: Option<f64>,
    pub co2_consump: Option<f64>,
    pub services: Option<f64>,
}

/// 2D histogram over (hdi_index, life_exp).
///
/// `x_edges` / `y_edges` hold `n + 1` boundaries each; `counts[ix][iy]`
/// counts the rows falling in column `ix`, row `iy`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub counts: Vec<Vec<u32>>,
    pub max_count: u32,
    pub total: u32,
}

// ---------------------------------------------------------------------------
// Mean accumulator
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ---------------------------------------------------------------------------
// Aggregators
// ---------------------------------------------------------------------------

/// Scatter markers; rows without a life expectancy cannot be placed.
///
/// Expects the output of `scatter_view`, so `gdp` is present.
pub fn scatter_points(scatter: &[&Record]) -> Vec<ScatterPoint> {
    scatter
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                country: r.country.clone(),
                continent: r.continent,
                gdp: r.gdp?,
                life_exp: r.life_exp?,
                co2_consump: r.co2_consump,
            })
        })
        .collect()
}

/// Mean life expectancy per `(year, continent)` over the whole dataset,
/// ignoring the selected year.  Ordered by year, then continent.
pub fn time_series(records: &[Record], continents: &BTreeSet<Continent>) -> Vec<TimeSeriesPoint> {
    let mut groups: BTreeMap<(i32, Continent), Mean> = BTreeMap::new();
    for r in records.iter().filter(|r| continents.contains(&r.continent)) {
        groups.entry((r.year, r.continent)).or_default().push(r.life_exp);
    }
    groups
        .into_iter()
        .filter_map(|((year, continent), mean)| {
            Some(TimeSeriesPoint {
                year,
                continent,
                mean_life_exp: mean.value()?,
            })
        })
        .collect()
}

/// Mean life expectancy per continent, highest first.
///
/// Groups are enumerated in continent order and sorted stably, so equal
/// means keep alphabetical continent order.
pub fn continent_means(linked: &[&Record]) -> Vec<ContinentMean> {
    let mut groups: BTreeMap<Continent, Mean> = BTreeMap::new();
    for r in linked {
        groups.entry(r.continent).or_default().push(r.life_exp);
    }
    let mut means: Vec<ContinentMean> = groups
        .into_iter()
        .filter_map(|(continent, mean)| {
            Some(ContinentMean {
                continent,
                mean_life_exp: mean.value()?,
                count: mean.count,
            })
        })
        .collect();
    means.sort_by(|a, b| b.mean_life_exp.total_cmp(&a.mean_life_exp));
    means
}

/// Equal-width partition of one observed axis.
#[derive(Debug, Clone, Copy)]
struct Axis {
    min: f64,
    width: f64,
    bins: usize,
}

impl Axis {
    fn fit(values: impl Iterator<Item = f64>, bins: usize) -> Option<Self> {
        let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
        let bins = bins.max(1);
        // A single distinct value still gets a visible cell.
        let (min, max) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
        Some(Axis {
            min,
            width: (max - min) / bins as f64,
            bins,
        })
    }

    fn index(&self, v: f64) -> usize {
        let i = ((v - self.min) / self.width).floor();
        if i <= 0.0 {
            0
        } else {
            (i as usize).min(self.bins - 1)
        }
    }

    fn edges(&self) -> Vec<f64> {
        (0..=self.bins)
            .map(|i| self.min + self.width * i as f64)
            .collect()
    }
}

/// 2D density of HDI against life expectancy.
///
/// Bin edges follow the observed range of the given rows, so they move
/// whenever the filter changes.  `None` when no row has both values.
pub fn density_bins(linked: &[&Record], nbins_x: usize, nbins_y: usize) -> Option<DensityGrid> {
    let pairs: Vec<(f64, f64)> = linked
        .iter()
        .filter_map(|r| Some((r.hdi_index?, r.life_exp?)))
        .collect();

    let x_axis = Axis::fit(pairs.iter().map(|p| p.0), nbins_x)?;
    let y_axis = Axis::fit(pairs.iter().map(|p| p.1), nbins_y)?;

    let mut counts = vec![vec![0u32; y_axis.bins]; x_axis.bins];
    for &(x, y) in &pairs {
        counts[x_axis.index(x)][y_axis.index(y)] += 1;
    }
    let max_count = counts.iter().flatten().copied().max().unwrap_or(0);

    Some(DensityGrid {
        x_edges: x_axis.edges(),
        y_edges: y_axis.edges(),
        counts,
        max_count,
        total: pairs.len() as u32,
    })
}

/// Absent values sort after every present one.
fn life_exp_descending(a: &Record, b: &Record) -> Ordering {
    match (a.life_exp, b.life_exp) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Table projection sorted by life expectancy, highest first.
///
/// Without an active selection only the first `limit` rows are kept; with
/// one, every selected row is returned.
pub fn table_rows(linked: &[&Record], selection_active: bool, limit: usize) -> Vec<TableRow> {
    let mut sorted = linked.to_vec();
    sorted.sort_by(|a, b| life_exp_descending(a, b));
    if !selection_active {
        sorted.truncate(limit);
    }
    sorted
        .into_iter()
        .map(|r| TableRow {
            country: r.country.clone(),
            continent: r.continent,
            life_exp: r.life_exp,
            hdi_index: r.hdi_index,
            gdp: r.gdp,
            co2_consump: r.co2_consump,
            services: r.services,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::tests::record;

    fn with_hdi(mut r: Record, hdi: Option<f64>) -> Record {
        r.hdi_index = hdi;
        r
    }

    #[test]
    fn time_series_groups_by_year_and_continent() {
        let data = vec![
            record("A", Continent::Asia, 2001, Some(60.0), None),
            record("B", Continent::Asia, 2001, Some(70.0), None),
            record("C", Continent::Africa, 2001, Some(50.0), None),
            record("D", Continent::Asia, 2000, Some(64.0), None),
            record("E", Continent::Asia, 2000, None, None),
            record("F", Continent::Europe, 2000, Some(75.0), None),
        ];
        let continents = BTreeSet::from([Continent::Asia, Continent::Africa]);
        let series = time_series(&data, &continents);
        assert_eq!(
            series,
            vec![
                TimeSeriesPoint { year: 2000, continent: Continent::Asia, mean_life_exp: 64.0 },
                TimeSeriesPoint { year: 2001, continent: Continent::Africa, mean_life_exp: 50.0 },
                TimeSeriesPoint { year: 2001, continent: Continent::Asia, mean_life_exp: 65.0 },
            ]
        );
    }

    #[test]
    fn time_series_skips_groups_without_values() {
        let data = vec![record("A", Continent::Oceania, 2000, None, None)];
        let continents = BTreeSet::from([Continent::Oceania]);
        assert!(time_series(&data, &continents).is_empty());
    }

    #[test]
    fn continent_means_for_selected_country() {
        let b = record("B", Continent::Asia, 2018, Some(70.0), Some(2000.0));
        let means = continent_means(&[&b]);
        assert_eq!(
            means,
            vec![ContinentMean { continent: Continent::Asia, mean_life_exp: 70.0, count: 1 }]
        );
    }

    #[test]
    fn continent_means_sorted_descending_with_alphabetical_ties() {
        let data = vec![
            record("A", Continent::Europe, 2000, Some(70.0), None),
            record("B", Continent::Africa, 2000, Some(55.0), None),
            record("C", Continent::Americas, 2000, Some(70.0), None),
            record("D", Continent::Africa, 2000, Some(65.0), None),
            record("E", Continent::Asia, 2000, None, None),
        ];
        let refs: Vec<&Record> = data.iter().collect();
        let means = continent_means(&refs);
        let order: Vec<Continent> = means.iter().map(|m| m.continent).collect();
        assert_eq!(order, vec![Continent::Americas, Continent::Europe, Continent::Africa]);
        assert_eq!(means[2].mean_life_exp, 60.0);
        assert_eq!(means[2].count, 2);
    }

    #[test]
    fn density_bins_partition_observed_range() {
        let data = vec![
            with_hdi(record("A", Continent::Asia, 2000, Some(50.0), None), Some(0.0)),
            with_hdi(record("B", Continent::Asia, 2000, Some(60.0), None), Some(0.5)),
            with_hdi(record("C", Continent::Asia, 2000, Some(70.0), None), Some(1.0)),
            with_hdi(record("D", Continent::Asia, 2000, Some(70.0), None), Some(1.0)),
            with_hdi(record("E", Continent::Asia, 2000, Some(65.0), None), None),
        ];
        let refs: Vec<&Record> = data.iter().collect();
        let grid = density_bins(&refs, 2, 4).unwrap();

        assert_eq!(grid.x_edges, vec![0.0, 0.5, 1.0]);
        assert_eq!(grid.y_edges, vec![50.0, 55.0, 60.0, 65.0, 70.0]);
        assert_eq!(grid.total, 4);
        assert_eq!(grid.counts[0][0], 1);
        // 0.5 and 60.0 sit on interior edges and go to the upper bin.
        assert_eq!(grid.counts[1][2], 1);
        // The maximum lands in the last bin on both axes.
        assert_eq!(grid.counts[1][3], 2);
        assert_eq!(grid.max_count, 2);
    }

    #[test]
    fn density_bins_widen_degenerate_axis() {
        let data = vec![with_hdi(record("A", Continent::Asia, 2000, Some(60.0), None), Some(0.7))];
        let refs: Vec<&Record> = data.iter().collect();
        let grid = density_bins(&refs, 20, 20).unwrap();
        assert_eq!(grid.x_edges.len(), 21);
        assert!((grid.x_edges[0] - 0.2).abs() < 1e-12);
        assert!((grid.x_edges[20] - 1.2).abs() < 1e-12);
        assert_eq!(grid.total, 1);
        assert_eq!(grid.counts[10][10], 1);
    }

    #[test]
    fn density_bins_empty_when_hdi_absent() {
        let data = vec![record("A", Continent::Asia, 2000, Some(60.0), None)];
        let refs: Vec<&Record> = data.iter().collect();
        assert_eq!(density_bins(&refs, 20, 20), None);
        assert_eq!(density_bins(&[], 20, 20), None);
    }

    #[test]
    fn table_rows_sorted_with_absent_last() {
        let data = vec![
            record("A", Continent::Asia, 2000, Some(60.0), None),
            record("B", Continent::Asia, 2000, None, None),
            record("C", Continent::Asia, 2000, Some(80.0), None),
        ];
        let refs: Vec<&Record> = data.iter().collect();
        let rows = table_rows(&refs, false, 15);
        let names: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn table_rows_truncate_only_without_selection() {
        let data: Vec<Record> = (0..20)
            .map(|i| record(&format!("C{i}"), Continent::Africa, 2000, Some(40.0 + i as f64), None))
            .collect();
        let refs: Vec<&Record> = data.iter().collect();

        let top = table_rows(&refs, false, 15);
        assert_eq!(top.len(), 15);
        assert_eq!(top[0].country, "C19");

        assert_eq!(table_rows(&refs, true, 15).len(), 20);
    }

    #[test]
    fn scatter_points_skip_missing_life_exp() {
        let data = vec![
            record("A", Continent::Asia, 2000, Some(60.0), Some(100.0)),
            record("B", Continent::Asia, 2000, None, Some(200.0)),
        ];
        let refs: Vec<&Record> = data.iter().collect();
        let points = scatter_points(&refs);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].country, "A");
        assert_eq!(points[0].gdp, 100.0);
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        (
            prop::sample::select(Continent::ALL.to_vec()),
            prop::option::of(20.0..90.0f64),
            prop::option::of(0.0..1.0f64),
        )
            .prop_map(|(continent, life_exp, hdi)| {
                with_hdi(record("X", continent, 2000, life_exp, None), hdi)
            })
    }

    proptest! {
        #[test]
        fn continent_means_sorted_and_counts_add_up(
            data in prop::collection::vec(arb_record(), 0..80),
        ) {
            let refs: Vec<&Record> = data.iter().collect();
            let means = continent_means(&refs);
            for pair in means.windows(2) {
                prop_assert!(pair[0].mean_life_exp >= pair[1].mean_life_exp);
            }
            let counted: usize = means.iter().map(|m| m.count).sum();
            let present = data.iter().filter(|r| r.life_exp.is_some()).count();
            prop_assert_eq!(counted, present);
        }

        #[test]
        fn table_rows_respect_limit(
            data in prop::collection::vec(arb_record(), 0..40),
            selection_active in any::<bool>(),
        ) {
            let refs: Vec<&Record> = data.iter().collect();
            let rows = table_rows(&refs, selection_active, 15);
            prop_assert!(rows.len() <= refs.len());
            if !selection_active && refs.len() > 15 {
                prop_assert_eq!(rows.len(), 15);
            }
            if selection_active {
                prop_assert_eq!(rows.len(), refs.len());
            }
        }

        #[test]
        fn density_counts_every_complete_row(
            data in prop::collection::vec(arb_record(), 0..80),
        ) {
            let refs: Vec<&Record> = data.iter().collect();
            let complete = data
                .iter()
                .filter(|r| r.life_exp.is_some() && r.hdi_index.is_some())
                .count();
            match density_bins(&refs, 20, 20) {
                None => prop_assert_eq!(complete, 0),
                Some(grid) => {
                    let summed: u32 = grid.counts.iter().flatten().sum();
                    prop_assert_eq!(summed as usize, complete);
                    prop_assert_eq!(grid.total as usize, complete);
                }
            }
        }
    }
}
