// Session: configuration, dataset selection, and the navigation state
// machine. The active league, loaded rows, and current position live in one
// explicit context rather than ambient globals, and every transition takes
// `now_ms` so the cool-down is testable without a wall clock.

use anyhow::{anyhow, bail, Result};

use crate::feed::DatasetFeed;
use crate::logging::{log, obj, v_bool, v_num, v_str, Domain, Level};
use crate::model::{CountryRow, League, VenueRecord};
use crate::render::{ChartFrame, ChartRenderer};

#[derive(Clone)]
pub struct Config {
    pub olympic_results: String,
    pub olympic_venues: String,
    pub fiba_results: String,
    pub fiba_venues: String,
    /// Transitions within this window after the last one are swallowed;
    /// the debounce that serializes rapid clicks.
    pub nav_cooldown_ms: u64,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            olympic_results: std::env::var("OLYMPIC_RESULTS")
                .unwrap_or_else(|_| "data/summerMensBasketball.csv".to_string()),
            olympic_venues: std::env::var("OLYMPIC_VENUES")
                .unwrap_or_else(|_| "data/summerMensBasketballLocations.csv".to_string()),
            fiba_results: std::env::var("FIBA_RESULTS")
                .unwrap_or_else(|_| "data/FibaMensBasketball.csv".to_string()),
            fiba_venues: std::env::var("FIBA_VENUES")
                .unwrap_or_else(|_| "data/FibaMensBasketballLocations.csv".to_string()),
            nav_cooldown_ms: std::env::var("NAV_COOLDOWN_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    pub fn sources_for(&self, league: League) -> (&str, &str) {
        match league {
            League::Olympics => (&self.olympic_results, &self.olympic_venues),
            League::Fiba => (&self.fiba_results, &self.fiba_venues),
        }
    }
}

pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Unselected,
    AtEdition(u32),
}

impl NavState {
    /// 0 for `Unselected`, otherwise the 1-based edition.
    pub fn index(&self) -> u32 {
        match self {
            NavState::Unselected => 0,
            NavState::AtEdition(n) => *n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved(u32),
    /// The move would cross a boundary; nothing changed.
    AtBound,
    /// Swallowed by the debounce window; nothing changed.
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub forward_enabled: bool,
    pub back_enabled: bool,
}

pub struct Session {
    cfg: Config,
    renderers: Vec<Box<dyn ChartRenderer>>,
    league: Option<League>,
    feed: Option<DatasetFeed>,
    rows: Vec<CountryRow>,
    nav: NavState,
    total_editions: u32,
    host: Option<VenueRecord>,
    last_transition_ms: u64,
}

impl Session {
    pub fn new(cfg: Config, renderers: Vec<Box<dyn ChartRenderer>>) -> Self {
        Self {
            cfg,
            renderers,
            league: None,
            feed: None,
            rows: Vec::new(),
            nav: NavState::Unselected,
            total_editions: 0,
            host: None,
            last_transition_ms: 0,
        }
    }

    pub fn nav(&self) -> NavState {
        self.nav
    }

    pub fn league(&self) -> Option<League> {
        self.league
    }

    pub fn total_editions(&self) -> u32 {
        self.total_editions
    }

    pub fn host(&self) -> Option<&VenueRecord> {
        self.host.as_ref()
    }

    fn in_cooldown(&self, now_ms: u64) -> bool {
        self.last_transition_ms != 0
            && now_ms.saturating_sub(self.last_transition_ms) < self.cfg.nav_cooldown_ms
    }

    /// Button enable/disable matrix: forward is off at the last edition (and
    /// whenever no edition beyond the current one exists), back is off at the
    /// first, and both are off during the cool-down or before selection.
    pub fn controls(&self, now_ms: u64) -> Controls {
        match self.nav {
            NavState::Unselected => Controls { forward_enabled: false, back_enabled: false },
            NavState::AtEdition(n) => {
                let ready = !self.in_cooldown(now_ms);
                Controls {
                    forward_enabled: ready && n < self.total_editions,
                    back_enabled: ready && n > 1,
                }
            }
        }
    }

    /// Select a dataset: load its result rows once and its venue table (whose
    /// row count fixes the number of editions), drop any prior chart state,
    /// then enter the first edition.
    pub async fn select(&mut self, league: League, now_ms: u64) -> Result<Outcome> {
        let (results_spec, venues_spec) = self.cfg.sources_for(league);
        let feed = DatasetFeed::from_specs(results_spec, venues_spec, self.cfg.http_timeout_secs);
        let rows = feed.load_results().await?;
        let venues = feed.load_venues().await?;

        log(
            Level::Info,
            Domain::Dataset,
            "select",
            obj(&[
                ("league", v_str(league.as_str())),
                ("rows", v_num(rows.len() as f64)),
                ("editions", v_num(venues.len() as f64)),
            ]),
        );

        self.league = Some(league);
        self.rows = rows;
        self.total_editions = venues.len() as u32;
        self.feed = Some(feed);
        self.nav = NavState::Unselected;
        self.host = None;
        self.last_transition_ms = 0;
        for r in self.renderers.iter_mut() {
            r.clear();
        }
        self.advance(0, now_ms).await
    }

    /// Move forward. `0` steps one edition ahead of the current state
    /// (entering edition 1 from `Unselected`); a positive target jumps
    /// straight to that edition. The pre-move index is checked against the
    /// edition count, so at the last edition (or with zero editions) this is
    /// a no-op and the forward control stays disabled until a backward move.
    pub async fn advance(&mut self, target: u32, now_ms: u64) -> Result<Outcome> {
        if self.feed.is_none() {
            bail!("no dataset selected");
        }
        if self.in_cooldown(now_ms) {
            return Ok(Outcome::Cooldown);
        }
        let base = if target != 0 { target - 1 } else { self.nav.index() };
        if base >= self.total_editions {
            log(
                Level::Debug,
                Domain::Nav,
                "advance_blocked",
                obj(&[
                    ("target", v_num(target as f64)),
                    ("editions", v_num(self.total_editions as f64)),
                ]),
            );
            return Ok(Outcome::AtBound);
        }
        let next = base + 1;
        self.enter(next, now_ms).await?;
        Ok(Outcome::Moved(next))
    }

    /// Move one edition backward; a no-op at the first edition.
    pub async fn retreat(&mut self, now_ms: u64) -> Result<Outcome> {
        if self.feed.is_none() {
            bail!("no dataset selected");
        }
        if self.in_cooldown(now_ms) {
            return Ok(Outcome::Cooldown);
        }
        let current = self.nav.index();
        if current <= 1 {
            return Ok(Outcome::AtBound);
        }
        self.enter(current - 1, now_ms).await?;
        Ok(Outcome::Moved(current - 1))
    }

    /// Back to the selection screen: drop the dataset and all chart state.
    pub fn home(&mut self) {
        self.league = None;
        self.feed = None;
        self.rows.clear();
        self.nav = NavState::Unselected;
        self.total_editions = 0;
        self.host = None;
        self.last_transition_ms = 0;
        for r in self.renderers.iter_mut() {
            r.clear();
        }
        log(Level::Info, Domain::Nav, "home", obj(&[]));
    }

    /// Enter an edition: re-fetch the venue table (it also re-defines the
    /// edition count), then rebuild and redraw both charts. The fetch comes
    /// first so a failed load aborts with state and charts untouched.
    async fn enter(&mut self, edition: u32, now_ms: u64) -> Result<()> {
        let feed = self.feed.as_ref().ok_or_else(|| anyhow!("no dataset selected"))?;
        let league = self.league.ok_or_else(|| anyhow!("no dataset selected"))?;
        let venues = feed.load_venues().await?;

        self.total_editions = venues.len() as u32;
        self.host = venues.iter().find(|v| v.id == edition).cloned();
        self.nav = NavState::AtEdition(edition);
        self.last_transition_ms = now_ms;

        let frame = ChartFrame::build(
            league,
            edition,
            self.total_editions,
            self.host.clone(),
            &self.rows,
        );
        for r in self.renderers.iter_mut() {
            r.clear();
            r.render(&frame)?;
        }
        log(
            Level::Debug,
            Domain::Render,
            "redraw",
            obj(&[
                ("charts", v_num(self.renderers.len() as f64)),
                ("qualifying", v_num(frame.rows.len() as f64)),
            ]),
        );

        log(
            Level::Info,
            Domain::Nav,
            "enter",
            obj(&[
                ("edition", v_num(edition as f64)),
                ("editions", v_num(self.total_editions as f64)),
                ("at_last", v_bool(edition >= self.total_editions)),
            ]),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullRenderer;

    fn config() -> Config {
        Config {
            olympic_results: "missing.csv".to_string(),
            olympic_venues: "missing.csv".to_string(),
            fiba_results: "missing.csv".to_string(),
            fiba_venues: "missing.csv".to_string(),
            nav_cooldown_ms: 200,
            http_timeout_secs: 1,
        }
    }

    #[test]
    fn controls_are_dead_before_selection() {
        let session = Session::new(config(), vec![Box::new(NullRenderer)]);
        let c = session.controls(1_000);
        assert!(!c.forward_enabled);
        assert!(!c.back_enabled);
    }

    #[tokio::test]
    async fn navigation_without_a_dataset_is_an_error() {
        let mut session = Session::new(config(), vec![Box::new(NullRenderer)]);
        assert!(session.advance(0, 1_000).await.is_err());
        assert!(session.retreat(1_000).await.is_err());
    }

    #[tokio::test]
    async fn select_fails_fast_on_a_missing_source() {
        let mut session = Session::new(config(), vec![Box::new(NullRenderer)]);
        assert!(session.select(League::Olympics, 1_000).await.is_err());
        assert_eq!(session.nav(), NavState::Unselected);
        assert!(session.league().is_none());
    }
}
