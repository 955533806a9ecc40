use crate::config::SourceConfig;
use crate::errors::FetchError;
use chrono::NaiveDate;
use std::future::Future;
use std::path::PathBuf;
use tokio::fs;

/// Where per-day `totals.json` files come from.
pub trait SummarySource {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

pub fn day_key(device_id: &str, date: NaiveDate) -> String {
    format!("{device_id}/{}/totals.json", date.format("%Y/%m/%d"))
}

pub fn fallback_key(device_id: &str) -> String {
    format!("{device_id}/totals.json")
}

#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SummarySource for FileSource {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        match fs::read(self.root.join(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(FetchError::NotFound {
                key: key.to_string(),
            }),
            Err(err) => Err(FetchError::Network {
                key: key.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl SummarySource for HttpSource {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}/{key}", self.base_url);
        let network = |reason: String| FetchError::Network {
            key: key.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| network(err.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                key: key.to_string(),
            });
        }
        if !status.is_success() {
            return Err(network(format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| network(err.to_string()))?;
        Ok(body.to_vec())
    }
}

#[derive(Debug, Clone)]
pub enum Source {
    Files(FileSource),
    Http(HttpSource),
}

impl Source {
    pub fn from_config(config: &SourceConfig) -> Self {
        match config {
            SourceConfig::Files(root) => Source::Files(FileSource::new(root.clone())),
            SourceConfig::Http(url) => Source::Http(HttpSource::new(url.clone())),
        }
    }
}

impl SummarySource for Source {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            Source::Files(source) => source.fetch(key).await,
            Source::Http(source) => source.fetch(key).await,
        }
    }
}
