use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Continent – the categorical grouping column
// ---------------------------------------------------------------------------

/// The five continent labels used by the dataset.
///
/// Declaration order is alphabetical, so the derived `Ord` doubles as the
/// display order and as the tie-break order for per-continent aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Continent {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Continent {
    pub const ALL: [Continent; 5] = [
        Continent::Africa,
        Continent::Americas,
        Continent::Asia,
        Continent::Europe,
        Continent::Oceania,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Americas => "Americas",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a cell does not name one of the known continents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContinent(pub String);

impl fmt::Display for UnknownContinent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown continent '{}'", self.0)
    }
}

impl std::error::Error for UnknownContinent {}

impl FromStr for Continent {
    type Err = UnknownContinent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Continent::ALL
            .into_iter()
            .find(|c| c.as_str() == trimmed)
            .ok_or_else(|| UnknownContinent(trimmed.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// One country-year observation.
///
/// `life_exp` is a required column, but individual cells may still be empty;
/// aggregations skip absent values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub continent: Continent,
    pub year: i32,
    pub life_exp: Option<f64>,
    pub hdi_index: Option<f64>,
    pub gdp: Option<f64>,
    pub co2_consump: Option<f64>,
    pub services: Option<f64>,
}

impl Record {
    /// Map NaN and infinite cells to `None` so every consumer sees a single
    /// notion of "absent".
    pub(crate) fn normalized(mut self) -> Self {
        for v in [
            &mut self.life_exp,
            &mut self.hdi_index,
            &mut self.gdp,
            &mut self.co2_consump,
            &mut self.services,
        ] {
            if v.is_some_and(|x| !x.is_finite()) {
                *v = None;
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// RecordSet – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable loaded dataset with pre-computed distinct values.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
    years: Vec<i32>,
    continents: Vec<Continent>,
}

impl RecordSet {
    /// Build the distinct-value indices from the loaded rows.
    pub fn from_records(records: Vec<Record>) -> Self {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let continents: BTreeSet<Continent> = records.iter().map(|r| r.continent).collect();
        RecordSet {
            records,
            years: years.into_iter().collect(),
            continents: continents.into_iter().collect(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Distinct continents, in continent order.
    pub fn continents(&self) -> &[Continent] {
        &self.continents
    }

    /// Inclusive `(min, max)` year range, `None` for an empty set.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        country: &str,
        continent: Continent,
        year: i32,
        life_exp: Option<f64>,
        gdp: Option<f64>,
    ) -> Record {
        Record {
            country: country.to_string(),
            continent,
            year,
            life_exp,
            hdi_index: None,
            gdp,
            co2_consump: None,
            services: None,
        }
    }

    #[test]
    fn continent_parses_exact_names_with_whitespace() {
        assert_eq!(" Asia ".parse::<Continent>(), Ok(Continent::Asia));
        assert_eq!("Oceania".parse::<Continent>(), Ok(Continent::Oceania));
        assert_eq!(
            "Antarctica".parse::<Continent>(),
            Err(UnknownContinent("Antarctica".to_string()))
        );
        assert!("asia".parse::<Continent>().is_err());
    }

    #[test]
    fn continent_order_is_alphabetical() {
        let mut names: Vec<&str> = Continent::ALL.iter().map(|c| c.as_str()).collect();
        let declared = names.clone();
        names.sort();
        assert_eq!(names, declared);
    }

    #[test]
    fn normalized_turns_nan_into_absent() {
        let mut r = record("A", Continent::Africa, 2000, Some(f64::NAN), Some(10.0));
        r.hdi_index = Some(f64::NAN);
        let r = r.normalized();
        assert_eq!(r.life_exp, None);
        assert_eq!(r.hdi_index, None);
        assert_eq!(r.gdp, Some(10.0));
    }

    #[test]
    fn normalized_turns_infinity_into_absent() {
        let mut r = record("A", Continent::Asia, 2018, Some(60.0), Some(f64::INFINITY));
        r.hdi_index = Some(f64::NEG_INFINITY);
        r.co2_consump = Some(1.5);
        let r = r.normalized();
        assert_eq!(r.gdp, None);
        assert_eq!(r.hdi_index, None);
        assert_eq!(r.co2_consump, Some(1.5));
        assert_eq!(r.life_exp, Some(60.0));
    }

    #[test]
    fn record_set_indexes_distinct_values() {
        let set = RecordSet::from_records(vec![
            record("A", Continent::Europe, 2001, Some(70.0), None),
            record("B", Continent::Africa, 1999, Some(50.0), None),
            record("C", Continent::Europe, 2001, Some(72.0), None),
        ]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.years(), &[1999, 2001]);
        assert_eq!(set.continents(), &[Continent::Africa, Continent::Europe]);
        assert_eq!(set.year_range(), Some((1999, 2001)));
    }

    #[test]
    fn empty_record_set_has_no_year_range() {
        let set = RecordSet::from_records(Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.year_range(), None);
    }
}
