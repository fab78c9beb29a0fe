use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ContinentPalette;
use crate::data::filter::FilterState;
use crate::data::loader::DatasetCache;
use crate::data::model::{Continent, RecordSet};
use crate::data::pipeline::{DashboardViews, ViewSettings};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The session context, independent of rendering.
///
/// Every UI event maps to one method here; each builds a fresh
/// [`FilterState`] and recomputes all views before the next frame.
pub struct AppState {
    /// Datasets loaded this session, keyed by path.
    cache: DatasetCache,

    /// Aggregation tunables from the config.
    pub settings: ViewSettings,

    /// Active dataset (None until a file loads).
    pub dataset: Option<Arc<RecordSet>>,

    /// Path the active dataset came from.
    pub source: Option<PathBuf>,

    /// Current filter; `None` exactly when `dataset` is `None`.
    pub filter: Option<FilterState>,

    /// Chart-ready output of the last recomputation.
    pub views: DashboardViews,

    /// Continent colours.
    pub palette: ContinentPalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewSettings::default())
    }
}

impl AppState {
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            cache: DatasetCache::new(),
            settings,
            dataset: None,
            source: None,
            filter: None,
            views: DashboardViews::default(),
            palette: ContinentPalette::default(),
            status_message: None,
        }
    }

    /// Load `path` through the cache and make it the active dataset.
    /// On failure the previous dataset (if any) stays active.
    pub fn open(&mut self, path: &Path) -> bool {
        match self.cache.load(path) {
            Ok(dataset) => {
                self.set_dataset(dataset, path.to_path_buf());
                true
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                false
            }
        }
    }

    /// Ingest a dataset and reset the filter to the session default.
    pub fn set_dataset(&mut self, dataset: Arc<RecordSet>, source: PathBuf) {
        self.filter = FilterState::initial(&dataset);
        self.dataset = Some(dataset);
        self.source = Some(source);
        self.status_message = None;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.views = match (&self.dataset, &self.filter) {
            (Some(ds), Some(filter)) => DashboardViews::compute(ds, filter, &self.settings),
            _ => DashboardViews::default(),
        };
    }

    /// Replace the filter wholesale and recompute.
    fn apply(&mut self, next: FilterState) {
        self.filter = Some(next);
        self.recompute();
    }

    /// Build the next filter from the current one.  No-op without a dataset.
    fn update(&mut self, change: impl FnOnce(&RecordSet, &mut FilterState)) {
        let (Some(ds), Some(current)) = (self.dataset.as_deref(), &self.filter) else {
            return;
        };
        let mut next = current.clone();
        change(ds, &mut next);
        self.apply(next);
    }

    /// Switch year, snapping to the nearest observed one.  Clears the
    /// scatter selection, which referred to the old year's points.
    pub fn set_year(&mut self, year: i32) {
        self.update(|ds, next| {
            let nearest = ds
                .years()
                .iter()
                .copied()
                .min_by_key(|y| (i64::from(*y) - i64::from(year)).abs());
            if let Some(nearest) = nearest {
                next.year = nearest;
            }
            next.selected_countries.clear();
        });
    }

    /// Toggle a single continent.  Clears the scatter selection.
    pub fn toggle_continent(&mut self, continent: Continent) {
        self.update(|_, next| {
            if !next.continents.remove(&continent) {
                next.continents.insert(continent);
            }
            next.selected_countries.clear();
        });
    }

    /// Select every continent present in the dataset.
    pub fn select_all_continents(&mut self) {
        self.update(|ds, next| {
            next.continents = ds.continents().iter().copied().collect();
            next.selected_countries.clear();
        });
    }

    /// Deselect every continent; all views become empty.
    pub fn select_no_continents(&mut self) {
        self.update(|_, next| {
            next.continents.clear();
            next.selected_countries.clear();
        });
    }

    /// Link the other views to `countries`; an empty set unlinks.
    pub fn set_selection(&mut self, countries: BTreeSet<String>) {
        self.update(|_, next| next.selected_countries = countries);
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(BTreeSet::new());
    }

    /// Select the scatter points inside a GDP / life-expectancy box.
    pub fn select_box(&mut self, gdp: RangeInclusive<f64>, life_exp: RangeInclusive<f64>) {
        let countries: BTreeSet<String> = self
            .views
            .scatter
            .iter()
            .filter(|p| gdp.contains(&p.gdp) && life_exp.contains(&p.life_exp))
            .map(|p| p.country.clone())
            .collect();
        log::debug!("Box selection picked {} countries", countries.len());
        self.set_selection(countries);
    }
}
