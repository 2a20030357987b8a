// Cumulative accolade arithmetic and the qualifying filter/ranking used to
// build chart frames. Everything recomputes from the raw rows; the cutoff
// changes on every navigation step so nothing here caches.

use crate::model::{AccoladeTriplet, CountryRow};

/// Per-category sums over editions 1..=through.
pub fn accolade_breakdown(row: &CountryRow, through: u32) -> AccoladeTriplet {
    let mut acc = AccoladeTriplet::default();
    for edition in 1..=through {
        let t = row.triplet(edition);
        acc.medals += t.medals;
        acc.all_star += t.all_star;
        acc.all_league += t.all_league;
    }
    acc
}

/// Total accolades over editions 1..=through. Non-decreasing in `through`
/// for a fixed row since every sub-field is non-negative.
pub fn accolade_total(row: &CountryRow, through: u32) -> u32 {
    accolade_breakdown(row, through).total()
}

/// Largest accolade total across the rows; 0 for an empty slice.
pub fn max_accolade_total(rows: &[CountryRow], through: u32) -> u32 {
    rows.iter()
        .map(|r| accolade_total(r, through))
        .max()
        .unwrap_or(0)
}

/// Min and max of `selector` over rows whose accolade total, population, and
/// GDP per capita are all non-zero. Returns `(f64::INFINITY, 0.0)` when no
/// row qualifies; callers must treat that pair as "no data".
pub fn min_max<F>(rows: &[CountryRow], through: u32, selector: F) -> (f64, f64)
where
    F: Fn(&CountryRow) -> f64,
{
    let mut lo = f64::INFINITY;
    let mut hi = 0.0_f64;
    for row in rows {
        if accolade_total(row, through) == 0
            || row.population_millions() == 0.0
            || row.gdp_per_capita_usd() == 0.0
        {
            continue;
        }
        let v = selector(row);
        if v > hi {
            hi = v;
        }
        if v < lo && v != 0.0 {
            lo = v;
        }
    }
    (lo, hi)
}

/// Continents of rows with a non-zero accolade total at the cutoff, in order
/// of first occurrence, deduplicated.
pub fn distinct_continents(rows: &[CountryRow], through: u32) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in rows {
        if accolade_total(row, through) > 0 && !out.contains(&row.continent) {
            out.push(row.continent.clone());
        }
    }
    out
}

/// Rows with non-zero population, GDP per capita, and accolade total.
pub fn qualifying(rows: &[CountryRow], through: u32) -> Vec<&CountryRow> {
    rows.iter()
        .filter(|r| {
            r.population_millions() != 0.0
                && r.gdp_per_capita_usd() != 0.0
                && accolade_total(r, through) != 0
        })
        .collect()
}

/// Qualifying rows ranked by accolade total, descending. The sort is stable:
/// rows with equal totals keep their encounter order.
pub fn ranked(rows: &[CountryRow], through: u32) -> Vec<&CountryRow> {
    let mut out = qualifying(rows, through);
    out.sort_by(|a, b| accolade_total(b, through).cmp(&accolade_total(a, through)));
    out
}
