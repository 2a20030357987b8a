// Terminal bubble chart: population on a log x-axis, GDP per capita on a
// linear y-axis, glyph size scaled by cumulative accolade total. A contract
// exerciser for the frame, not a faithful chart.

use anyhow::Result;
use std::io::Write;

use super::{ChartFrame, ChartRenderer};

const GRID_W: usize = 64;
const GRID_H: usize = 18;
const GLYPHS: [char; 4] = ['.', 'o', 'O', '@'];

pub struct BubbleChart<W: Write> {
    out: W,
}

impl<W: Write> BubbleChart<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

/// Square-root size scale: doubling the accolades should not double the
/// glyph.
fn glyph_for(total: u32, max: u32) -> char {
    if max <= 1 {
        return GLYPHS[0];
    }
    let t = (total as f64).sqrt() / (max as f64).sqrt();
    let idx = (t * (GLYPHS.len() - 1) as f64).round() as usize;
    GLYPHS[idx.min(GLYPHS.len() - 1)]
}

fn x_pos(pop: f64, lo: f64, hi: f64) -> usize {
    if !lo.is_finite() || hi <= lo || pop <= 0.0 || lo <= 0.0 {
        return 0;
    }
    let t = (pop.ln() - lo.ln()) / (hi.ln() - lo.ln());
    (t.clamp(0.0, 1.0) * (GRID_W - 1) as f64).round() as usize
}

fn y_pos(gdp: f64, lo: f64, hi: f64) -> usize {
    if !lo.is_finite() || hi <= lo {
        return GRID_H - 1;
    }
    let t = (gdp - lo) / (hi - lo);
    ((1.0 - t.clamp(0.0, 1.0)) * (GRID_H - 1) as f64).round() as usize
}

impl<W: Write> ChartRenderer for BubbleChart<W> {
    fn clear(&mut self) {
        let _ = writeln!(self.out);
    }

    fn render(&mut self, frame: &ChartFrame<'_>) -> Result<()> {
        writeln!(self.out, "{}", frame.heading())?;
        if frame.rows.is_empty() {
            writeln!(self.out, "  (no qualifying countries)")?;
            return Ok(());
        }

        let (pop_lo, pop_hi) = frame.population_range;
        let (gdp_lo, gdp_hi) = frame.gdp_range;

        let mut grid = vec![[' '; GRID_W]; GRID_H];
        // Ranked rows come largest first; plot in reverse so the biggest
        // bubbles win overlapping cells.
        for fr in frame.rows.iter().rev() {
            let x = x_pos(fr.population, pop_lo, pop_hi);
            let y = y_pos(fr.gdp_per_capita, gdp_lo, gdp_hi);
            grid[y][x] = glyph_for(fr.total, frame.max_accolades);
        }

        writeln!(self.out, "  gdp/capita ${:.0} .. ${:.0}", gdp_lo, gdp_hi)?;
        for line in &grid {
            writeln!(self.out, "  |{}", line.iter().collect::<String>())?;
        }
        writeln!(self.out, "  +{}", "-".repeat(GRID_W))?;
        writeln!(
            self.out,
            "  population {:.3}M .. {:.3}M (log scale)",
            pop_lo, pop_hi
        )?;
        let top: Vec<String> = frame
            .rows
            .iter()
            .take(8)
            .map(|fr| format!("{}={}", fr.row.code, fr.total))
            .collect();
        writeln!(self.out, "  top: {}", top.join("  "))?;
        writeln!(self.out, "  continents: {}", frame.continents.join(", "))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccoladeTriplet, CountryRow, League};
    use crate::render::ChartFrame;

    fn row(code: &str, pop: &str, gdp: &str, medals: u32) -> CountryRow {
        CountryRow {
            name: code.to_string(),
            code: code.to_string(),
            continent: "Europe".to_string(),
            population: pop.to_string(),
            gdp_per_capita: gdp.to_string(),
            editions: vec![AccoladeTriplet { medals, all_star: 0, all_league: 0 }],
        }
    }

    #[test]
    fn renders_axes_and_top_list() {
        let rows = vec![
            row("USA", "331,900,000", "70,248", 9),
            row("NOR", "5,425,270", "89,202", 1),
        ];
        let frame = ChartFrame::build(League::Olympics, 1, 5, None, &rows);
        let mut buf = Vec::new();
        BubbleChart::new(&mut buf).render(&frame).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("USA=9"));
        assert!(text.contains("log scale"));
        assert!(text.contains("continents: Europe"));
    }

    #[test]
    fn empty_frame_renders_the_placeholder() {
        let frame = ChartFrame::build(League::Fiba, 1, 1, None, &[]);
        let mut buf = Vec::new();
        BubbleChart::new(&mut buf).render(&frame).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("no qualifying countries"));
    }

    #[test]
    fn scales_stay_in_bounds_on_degenerate_domains() {
        assert_eq!(x_pos(5.0, f64::INFINITY, 0.0), 0);
        assert_eq!(y_pos(5.0, f64::INFINITY, 0.0), GRID_H - 1);
        assert_eq!(x_pos(10.0, 10.0, 10.0), 0);
        assert!(x_pos(1000.0, 1.0, 100.0) <= GRID_W - 1);
    }
}
