// Terminal bar chart: countries ranked by cumulative accolade total.

use anyhow::Result;
use std::io::Write;

use super::{ChartFrame, ChartRenderer};

const BAR_W: usize = 40;

pub struct BarChart<W: Write> {
    out: W,
}

impl<W: Write> BarChart<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ChartRenderer for BarChart<W> {
    fn clear(&mut self) {
        let _ = writeln!(self.out);
    }

    fn render(&mut self, frame: &ChartFrame<'_>) -> Result<()> {
        writeln!(self.out, "cumulative accolades, {}", frame.heading())?;
        if frame.rows.is_empty() {
            writeln!(self.out, "  (no qualifying countries)")?;
            return Ok(());
        }

        let max = frame.max_accolades.max(1) as usize;
        for fr in &frame.rows {
            let width = ((fr.total as usize * BAR_W) / max).max(1);
            writeln!(
                self.out,
                "  {:>4} {:<pad$} {} ({}m/{}s/{}l)",
                fr.row.code,
                "#".repeat(width),
                fr.total,
                fr.accolades.medals,
                fr.accolades.all_star,
                fr.accolades.all_league,
                pad = BAR_W
            )?;
        }
        writeln!(self.out, "  continents: {}", frame.continents.join(", "))?;
        writeln!(self.out, "  edition {}/{}", frame.edition, frame.total_editions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccoladeTriplet, CountryRow, League};
    use crate::render::ChartFrame;

    fn row(code: &str, medals: u32) -> CountryRow {
        CountryRow {
            name: code.to_string(),
            code: code.to_string(),
            continent: "Europe".to_string(),
            population: "1,000,000".to_string(),
            gdp_per_capita: "10,000".to_string(),
            editions: vec![AccoladeTriplet { medals, all_star: 0, all_league: 0 }],
        }
    }

    #[test]
    fn bars_come_out_ranked_with_breakdowns() {
        let rows = vec![row("NOR", 1), row("USA", 9)];
        let frame = ChartFrame::build(League::Olympics, 1, 5, None, &rows);
        let mut buf = Vec::new();
        BarChart::new(&mut buf).render(&frame).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let usa = text.find("USA").unwrap();
        let nor = text.find("NOR").unwrap();
        assert!(usa < nor);
        assert!(text.contains("9 (9m/0s/0l)"));
        assert!(text.contains("edition 1/5"));
    }
}
