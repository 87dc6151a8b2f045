//! Async HTTP client for the iTunes Search API.

use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{Error, Result};

/// One search result: a flat JSON object keyed by API field name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Query settings for the search endpoint.
#[derive(Debug, Clone)]
pub struct SearchConfig {
  pub api_url: String,
  pub limit:   u32,
  pub country: String,
  pub media:   String,
}

/// Anything that can run one term search. [`SearchClient`] is the real one.
pub trait TermSearch: Send + Sync {
  fn search(&self, term: &str) -> impl Future<Output = Result<Vec<Record>>> + Send;
}

#[derive(Deserialize)]
struct SearchResponse {
  #[serde(default)]
  results: Vec<Record>,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SearchClient {
  client: Client,
  config: SearchConfig,
}

impl SearchClient {
  pub fn new(config: SearchConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }
}

impl TermSearch for SearchClient {
  /// `GET <api_url>?term=<term>&limit=<n>&country=<c>&media=<m>`
  async fn search(&self, term: &str) -> Result<Vec<Record>> {
    let limit = self.config.limit.to_string();
    let resp = self
      .client
      .get(&self.config.api_url)
      .query(&[
        ("term", term),
        ("limit", limit.as_str()),
        ("country", self.config.country.as_str()),
        ("media", self.config.media.as_str()),
      ])
      .send()
      .await?;

    if resp.status() != StatusCode::OK {
      return Err(Error::Status {
        term:   term.to_owned(),
        status: resp.status(),
      });
    }
    let body: SearchResponse = resp.json().await?;
    Ok(body.results)
  }
}
