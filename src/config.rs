use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::pipeline::ViewSettings;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "devtrends.json";
/// Names an alternative config file.
pub const CONFIG_ENV: &str = "DEVTRENDS_CONFIG";
/// Overrides `data_path`.
pub const DATA_ENV: &str = "DEVTRENDS_DATA";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings.  Every field has a default, so a config file only needs
/// the keys it changes:
///
/// ```json
/// { "data_path": "dataset/indicators.parquet", "nbins_x": 30 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub nbins_x: usize,
    pub nbins_y: usize,
    pub table_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let views = ViewSettings::default();
        Self {
            data_path: PathBuf::from("dataset/gapminder_data_graphs.csv"),
            nbins_x: views.nbins_x,
            nbins_y: views.nbins_y,
            table_limit: views.table_limit,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then the config file, then the environment.
    pub fn resolve() -> Self {
        Self::resolve_from(
            Path::new(CONFIG_FILE),
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os(DATA_ENV).map(PathBuf::from),
        )
    }

    /// `explicit_file` must exist when given; `default_file` may be absent.
    fn resolve_from(
        default_file: &Path,
        explicit_file: Option<PathBuf>,
        data_override: Option<PathBuf>,
    ) -> Self {
        let from_file = match explicit_file {
            Some(path) => Some(Self::from_file(&path)),
            None if default_file.exists() => Some(Self::from_file(default_file)),
            None => None,
        };

        let mut config = match from_file {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
            None => Self::default(),
        };

        if let Some(path) = data_override {
            log::info!("Data path overridden by {DATA_ENV}: {}", path.display());
            config.data_path = path;
        }

        config.validated()
    }

    /// Replace zero counts with defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        for (name, value, fallback) in [
            ("nbins_x", &mut self.nbins_x, defaults.nbins_x),
            ("nbins_y", &mut self.nbins_y, defaults.nbins_y),
            ("table_limit", &mut self.table_limit, defaults.table_limit),
        ] {
            if *value == 0 {
                log::warn!("Config {name} must be positive; using {fallback}");
                *value = fallback;
            }
        }
        self
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            nbins_x: self.nbins_x,
            nbins_y: self.nbins_y,
            table_limit: self.table_limit,
        }
    }
}
