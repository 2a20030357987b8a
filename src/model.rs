// Data model for competition tables: one row per country, one venue per edition.

use serde::{Deserialize, Serialize};

/// The three tracked achievement categories for one edition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccoladeTriplet {
    pub medals: u32,
    pub all_star: u32,
    pub all_league: u32,
}

impl AccoladeTriplet {
    pub fn total(&self) -> u32 {
        self.medals + self.all_star + self.all_league
    }
}

/// One country within one dataset. Population and GDP keep the raw cell text;
/// normalization happens in the accessors so malformed cells degrade to zero
/// instead of failing the load.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub name: String,
    pub code: String,
    pub continent: String,
    pub population: String,
    pub gdp_per_capita: String,
    /// Per-edition counts, index 0 = edition 1.
    pub editions: Vec<AccoladeTriplet>,
}

impl CountryRow {
    /// Population in millions, rounded to three decimal places.
    /// Empty or unparseable cells yield 0.0.
    pub fn population_millions(&self) -> f64 {
        (lenient_int(&self.population) as f64 / 1000.0).round() / 1000.0
    }

    /// GDP per capita in whole USD. Empty or unparseable cells yield 0.0.
    pub fn gdp_per_capita_usd(&self) -> f64 {
        lenient_int(&self.gdp_per_capita) as f64
    }

    /// Counts for a 1-based edition. Editions beyond the stored range read as
    /// all-zero, matching the source tables where later columns are absent.
    pub fn triplet(&self, edition: u32) -> AccoladeTriplet {
        edition
            .checked_sub(1)
            .and_then(|i| self.editions.get(i as usize))
            .copied()
            .unwrap_or_default()
    }
}

/// The two selectable datasets. Selecting one fixes which results/venue pair
/// is active until the session is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum League {
    Olympics,
    Fiba,
}

impl League {
    pub fn as_str(&self) -> &'static str {
        match self {
            League::Olympics => "olympics",
            League::Fiba => "fiba",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            League::Olympics => "Mens Summer Olympics",
            League::Fiba => "FIBA Mens Basketball",
        }
    }
}

/// Host metadata for one edition. Display-only; the venue table's row count
/// is what fixes the number of editions a session can reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: u32,
    pub year: String,
    pub city: String,
    pub country: String,
}

/// Leading-integer parse over a cell stripped of grouping characters:
/// optional sign, then digits, stop at the first non-digit. Anything that
/// leaves no digits parses as 0.
pub fn lenient_int(raw: &str) -> i64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .collect();

    let mut digits = String::new();
    let mut rest = cleaned.chars().peekable();
    if let Some(&c) = rest.peek() {
        if c == '+' || c == '-' {
            digits.push(c);
            rest.next();
        }
    }
    while let Some(&c) = rest.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        rest.next();
    }

    if digits.is_empty() || digits == "+" || digits == "-" {
        return 0;
    }
    digits.parse().unwrap_or(0)
}

/// Lenient count parse: negative or unparseable cells clamp to zero.
pub fn lenient_count(raw: &str) -> u32 {
    lenient_int(raw).max(0) as u32
}
