//! Synthetic rows for tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::RawRow;
use crate::dataset::columns::column;

pub const COUNTRIES: [(&str, &str); 6] = [
    ("Somalia", "Africa"),
    ("Sudan", "Africa"),
    ("Colombia", "Americas"),
    ("Afghanistan", "Asia"),
    ("Ukraine", "Europe"),
    ("Syria", "Middle East"),
];

pub const FACTIONS: [&str; 6] = [
    "Government of Somalia",
    "Al-Shabaab",
    "Government of Colombia",
    "FARC",
    "Taleban",
    "Civilians",
];

/// Chainable builder for a single raw row.
#[derive(Default)]
pub struct RowBuilder {
    fields: Vec<(&'static str, String)>,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl ToString) -> Self {
        self.fields.push((column, value.to_string()));
        self
    }

    pub fn country(self, country: &str) -> Self {
        self.set(column::COUNTRY, country)
    }

    pub fn region(self, region: &str) -> Self {
        self.set(column::REGION, region)
    }

    pub fn year(self, year: i32) -> Self {
        self.set(column::YEAR, year)
    }

    pub fn date(self, date: &str) -> Self {
        self.set(column::DATE_START, date)
    }

    pub fn best(self, best: i64) -> Self {
        self.set(column::BEST, best)
    }

    pub fn violence(self, code: i64) -> Self {
        self.set(column::TYPE_OF_VIOLENCE, code)
    }

    pub fn coords(self, latitude: f64, longitude: f64) -> Self {
        self.set(column::LATITUDE, latitude)
            .set(column::LONGITUDE, longitude)
    }

    pub fn sides(self, side_a: &str, side_b: &str) -> Self {
        self.set(column::SIDE_A, side_a).set(column::SIDE_B, side_b)
    }

    pub fn deaths(self, a: u32, b: u32, civilians: u32, unknown: u32) -> Self {
        self.set(column::DEATHS_A, a)
            .set(column::DEATHS_B, b)
            .set(column::DEATHS_CIVILIANS, civilians)
            .set(column::DEATHS_UNKNOWN, unknown)
    }

    pub fn build(self) -> RawRow {
        self.fields.into_iter().collect()
    }
}

/// Shorthand for the common country/year/best triple.
pub fn row(country: &str, year: i32, best: i64) -> RawRow {
    RowBuilder::new().country(country).year(year).best(best).build()
}

/// Random but reproducible dataset covering every field the indices use.
pub fn synthetic_rows(count: usize, seed: u64) -> Vec<RawRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let (country, region) = COUNTRIES[rng.gen_range(0..COUNTRIES.len())];
            let year = rng.gen_range(1989..2024);
            let month = rng.gen_range(1..=12);
            let a = rng.gen_range(0..20u32);
            let b = rng.gen_range(0..20u32);
            let civilians = rng.gen_range(0..5u32);
            let mut builder = RowBuilder::new()
                .set(column::ID, i)
                .country(country)
                .region(region)
                .year(year)
                .date(&format!("{year}-{month:02}-15"))
                .violence(rng.gen_range(1..=4))
                .deaths(a, b, civilians, 0)
                // some rows end up with best == 0 and are dropped at load
                .best((a + b + civilians) as i64 - rng.gen_range(0..2));
            if rng.gen_bool(0.8) {
                builder = builder.coords(rng.gen_range(-40.0..40.0), rng.gen_range(-80.0..80.0));
            }
            if rng.gen_bool(0.9) {
                let side_a = FACTIONS[rng.gen_range(0..FACTIONS.len())];
                let side_b = FACTIONS[rng.gen_range(0..FACTIONS.len())];
                builder = builder.sides(side_a, side_b);
            }
            builder.build()
        })
        .collect()
}
