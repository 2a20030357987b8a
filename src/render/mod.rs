// Chart-frame contract between the session and its render collaborators.
// The session prepares everything a chart needs; renderers never touch the
// aggregation layer themselves.

pub mod bars;
pub mod bubble;

pub use bars::BarChart;
pub use bubble::BubbleChart;

use anyhow::Result;

use crate::aggregate;
use crate::model::{AccoladeTriplet, CountryRow, League, VenueRecord};

/// One qualifying country with its scalars precomputed at the frame's
/// edition cutoff.
#[derive(Debug, Clone)]
pub struct FrameRow<'a> {
    pub row: &'a CountryRow,
    pub population: f64,
    pub gdp_per_capita: f64,
    pub accolades: AccoladeTriplet,
    pub total: u32,
}

/// Everything the renderers consume for one edition. Rows come ranked by
/// accolade total; the extrema pairs are `(f64::INFINITY, 0.0)` when no row
/// qualifies, and renderers must treat that as an empty chart.
#[derive(Debug, Clone)]
pub struct ChartFrame<'a> {
    pub league: League,
    pub edition: u32,
    pub total_editions: u32,
    pub host: Option<VenueRecord>,
    pub rows: Vec<FrameRow<'a>>,
    pub continents: Vec<String>,
    pub max_accolades: u32,
    pub population_range: (f64, f64),
    pub gdp_range: (f64, f64),
}

impl<'a> ChartFrame<'a> {
    pub fn build(
        league: League,
        edition: u32,
        total_editions: u32,
        host: Option<VenueRecord>,
        rows: &'a [CountryRow],
    ) -> Self {
        let frame_rows = aggregate::ranked(rows, edition)
            .into_iter()
            .map(|row| {
                let accolades = aggregate::accolade_breakdown(row, edition);
                FrameRow {
                    population: row.population_millions(),
                    gdp_per_capita: row.gdp_per_capita_usd(),
                    total: accolades.total(),
                    accolades,
                    row,
                }
            })
            .collect();
        Self {
            league,
            edition,
            total_editions,
            host,
            continents: aggregate::distinct_continents(rows, edition),
            max_accolades: aggregate::max_accolade_total(rows, edition),
            population_range: aggregate::min_max(rows, edition, |r| r.population_millions()),
            gdp_range: aggregate::min_max(rows, edition, |r| r.gdp_per_capita_usd()),
            rows: frame_rows,
        }
    }

    /// Title line shared by both charts, e.g.
    /// "Mens Summer Olympics in Berlin (1936)".
    pub fn heading(&self) -> String {
        match &self.host {
            Some(v) => format!("{} in {} ({})", self.league.label(), v.city, v.year),
            None => format!("{} — edition {}", self.league.label(), self.edition),
        }
    }
}

/// Render collaborators receive a prepared frame and draw it somewhere. The
/// core consumes nothing back except the error. Prior output must be
/// discarded in `clear` before each redraw.
pub trait ChartRenderer {
    fn clear(&mut self);
    fn render(&mut self, frame: &ChartFrame<'_>) -> Result<()>;
}

// Stub renderer to make wiring explicit.
pub struct NullRenderer;

impl ChartRenderer for NullRenderer {
    fn clear(&mut self) {}

    fn render(&mut self, _frame: &ChartFrame<'_>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccoladeTriplet;

    fn row(code: &str, continent: &str, pop: &str, gdp: &str, triplets: &[[u32; 3]]) -> CountryRow {
        CountryRow {
            name: code.to_string(),
            code: code.to_string(),
            continent: continent.to_string(),
            population: pop.to_string(),
            gdp_per_capita: gdp.to_string(),
            editions: triplets
                .iter()
                .map(|[m, s, l]| AccoladeTriplet { medals: *m, all_star: *s, all_league: *l })
                .collect(),
        }
    }

    #[test]
    fn frame_rows_are_ranked_and_precomputed() {
        let rows = vec![
            row("SWE", "Europe", "10,400,000", "60,000", &[[1, 0, 0]]),
            row("USA", "North America", "331,900,000", "70,248", &[[3, 4, 2]]),
        ];
        let frame = ChartFrame::build(League::Olympics, 1, 5, None, &rows);
        assert_eq!(frame.rows[0].row.code, "USA");
        assert_eq!(frame.rows[0].total, 9);
        assert_eq!(frame.rows[1].population, 10.4);
        assert_eq!(frame.max_accolades, 9);
        assert_eq!(frame.continents, vec!["Europe", "North America"]);
    }

    #[test]
    fn empty_frame_keeps_the_degenerate_extrema() {
        let rows = vec![row("SWE", "Europe", "10,400,000", "60,000", &[[0, 0, 0]])];
        let frame = ChartFrame::build(League::Fiba, 1, 3, None, &rows);
        assert!(frame.rows.is_empty());
        assert_eq!(frame.population_range, (f64::INFINITY, 0.0));
        assert_eq!(frame.gdp_range, (f64::INFINITY, 0.0));
    }

    #[test]
    fn heading_prefers_the_host_record() {
        let host = VenueRecord {
            id: 1,
            year: "1936".to_string(),
            city: "Berlin".to_string(),
            country: "Germany".to_string(),
        };
        let frame = ChartFrame::build(League::Olympics, 1, 5, Some(host), &[]);
        assert_eq!(frame.heading(), "Mens Summer Olympics in Berlin (1936)");
    }
}
