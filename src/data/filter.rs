use std::collections::BTreeSet;

use super::model::{Continent, Record, RecordSet};

// ---------------------------------------------------------------------------
// Filter state: the user's current year / continent / selection choice
// ---------------------------------------------------------------------------

/// Selection state for one recomputation pass.
///
/// A new value replaces the previous one on every interaction; nothing is
/// patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub year: i32,
    pub continents: BTreeSet<Continent>,
    /// Countries picked on the scatter.  Empty means "no linking".
    pub selected_countries: BTreeSet<String>,
}

impl FilterState {
    /// Session default: latest year, every continent present, no selection.
    /// `None` for an empty dataset.
    pub fn initial(dataset: &RecordSet) -> Option<Self> {
        let (_, latest) = dataset.year_range()?;
        Some(FilterState {
            year: latest,
            continents: dataset.continents().iter().copied().collect(),
            selected_countries: BTreeSet::new(),
        })
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_countries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Rows of `year` whose continent is selected.
pub fn year_view<'a>(
    records: &'a [Record],
    year: i32,
    continents: &BTreeSet<Continent>,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| r.year == year && continents.contains(&r.continent))
        .collect()
}

/// [`year_view`] restricted to rows that can sit on a log GDP axis
/// (`gdp` present and strictly positive).
pub fn scatter_view<'a>(
    records: &'a [Record],
    year: i32,
    continents: &BTreeSet<Continent>,
) -> Vec<&'a Record> {
    year_view(records, year, continents)
        .into_iter()
        .filter(|r| r.gdp.is_some_and(|gdp| gdp > 0.0))
        .collect()
}

/// Narrow a year-filtered view to the selected countries.
///
/// An empty selection is the identity: the caller gets the same rows back.
pub fn linked_view<'a>(
    year_filtered: &[&'a Record],
    selected: &BTreeSet<String>,
) -> Vec<&'a Record> {
    if selected.is_empty() {
        return year_filtered.to_vec();
    }
    year_filtered
        .iter()
        .copied()
        .filter(|r| selected.contains(&r.country))
        .collect()
}
