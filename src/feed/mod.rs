//! One-shot table sources. Every load is a single fetch with no retry and no
//! caching: a failed load is fatal to the navigation attempt that asked for
//! it, and rapid re-loads are throttled upstream by the session cool-down.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::data::{parse_results_csv, parse_venues_csv};
use crate::model::{CountryRow, VenueRecord};

#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;
    fn describe(&self) -> String;
}

pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl TableSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            bail!("{} returned {}", self.url, resp.status());
        }
        Ok(resp.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: &str) -> Self {
        Self { path: PathBuf::from(path) }
    }
}

#[async_trait]
impl TableSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// URL specs get an HTTP source, anything else is treated as a local path.
pub fn source_for_spec(spec: &str, timeout_secs: u64) -> Box<dyn TableSource> {
    if spec.starts_with("http://") || spec.starts_with("https://") {
        Box::new(HttpSource::new(spec, timeout_secs))
    } else {
        Box::new(FileSource::new(spec))
    }
}

/// A results table paired with its venue table. Parsing happens at load time
/// so callers only ever see typed rows.
pub struct DatasetFeed {
    results: Box<dyn TableSource>,
    venues: Box<dyn TableSource>,
}

impl DatasetFeed {
    pub fn new(results: Box<dyn TableSource>, venues: Box<dyn TableSource>) -> Self {
        Self { results, venues }
    }

    pub fn from_specs(results_spec: &str, venues_spec: &str, timeout_secs: u64) -> Self {
        Self::new(
            source_for_spec(results_spec, timeout_secs),
            source_for_spec(venues_spec, timeout_secs),
        )
    }

    pub async fn load_results(&self) -> Result<Vec<CountryRow>> {
        let text = self
            .results
            .fetch()
            .await
            .with_context(|| format!("loading results from {}", self.results.describe()))?;
        parse_results_csv(&text)
    }

    pub async fn load_venues(&self) -> Result<Vec<VenueRecord>> {
        let text = self
            .venues
            .fetch()
            .await
            .with_context(|| format!("loading venues from {}", self.venues.describe()))?;
        parse_venues_csv(&text)
    }
}
