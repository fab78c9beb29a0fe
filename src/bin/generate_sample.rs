use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One output row, columns in the order of the real dataset.
#[derive(Debug, Serialize)]
struct Row {
    country: String,
    continent: &'static str,
    year: i64,
    life_exp: f64,
    hdi_index: Option<f64>,
    co2_consump: Option<f64>,
    gdp: Option<f64>,
    services: Option<f64>,
}

/// (continent, countries, baseline life expectancy, baseline GDP per capita)
const CONTINENTS: [(&str, &[&str], f64, f64); 5] = [
    ("Africa", &["Kenya", "Ghana", "Senegal", "Botswana", "Ethiopia", "Morocco"], 55.0, 1_500.0),
    ("Americas", &["Chile", "Canada", "Peru", "Mexico", "Brazil", "Uruguay"], 72.0, 9_000.0),
    ("Asia", &["Japan", "India", "Vietnam", "Jordan", "Nepal", "Malaysia"], 68.0, 5_000.0),
    ("Europe", &["Norway", "Spain", "Poland", "Estonia", "Greece", "Ireland"], 77.0, 25_000.0),
    ("Oceania", &["Australia", "New Zealand"], 79.0, 35_000.0),
];

const FIRST_YEAR: i64 = 1998;
const LAST_YEAR: i64 = 2018;

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(continent, countries, base_life, base_gdp) in &CONTINENTS {
        for &country in countries {
            let life_offset = rng.gauss(0.0, 4.0);
            let gdp_factor = rng.gauss(1.0, 0.35).max(0.2);
            let growth = rng.gauss(0.025, 0.01);
            let services_base = rng.gauss(55.0, 8.0);

            for year in FIRST_YEAR..=LAST_YEAR {
                let t = (year - FIRST_YEAR) as f64;
                let gdp = base_gdp * gdp_factor * (1.0 + growth).powf(t) * rng.gauss(1.0, 0.03);
                let life_exp = base_life + life_offset + 0.2 * t + rng.gauss(0.0, 0.4);
                let hdi = (0.25 + life_exp / 140.0 + gdp.ln() / 60.0).clamp(0.2, 0.99);

                rows.push(Row {
                    country: country.to_string(),
                    continent,
                    year,
                    life_exp: (life_exp * 10.0).round() / 10.0,
                    hdi_index: (!rng.chance(0.05)).then_some((hdi * 1000.0).round() / 1000.0),
                    co2_consump: Some((gdp / 4_000.0 * rng.gauss(1.0, 0.2)).max(0.05)),
                    gdp: (!rng.chance(0.03)).then_some(gdp.round()),
                    services: Some((services_base + 0.3 * t).clamp(10.0, 90.0)),
                });
            }
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let optional = |f: fn(&Row) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("continent", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("life_exp", DataType::Float64, true),
        Field::new("hdi_index", DataType::Float64, true),
        Field::new("co2_consump", DataType::Float64, true),
        Field::new("gdp", DataType::Float64, true),
        Field::new("services", DataType::Float64, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.continent).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
        optional(|r| Some(r.life_exp)),
        optional(|r| r.hdi_index),
        optional(|r| r.co2_consump),
        optional(|r| r.gdp),
        optional(|r| r.services),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let dir = Path::new("dataset");
    std::fs::create_dir_all(dir).context("creating dataset directory")?;

    let csv_path = dir.join("gapminder_data_graphs.csv");
    let parquet_path = dir.join("gapminder_data_graphs.parquet");
    write_csv(&rows, &csv_path)?;
    write_parquet(&rows, &parquet_path)?;

    println!(
        "Wrote {} rows ({}–{}) to {} and {}",
        rows.len(),
        FIRST_YEAR,
        LAST_YEAR,
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
