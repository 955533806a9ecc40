use chrono::NaiveDate;
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DEVICE: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Files(PathBuf),
    Http(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub source: SourceConfig,
    pub default_device: String,
    pub cache: bool,
    pub fallback: bool,
    /// Fixed "today" for replaying a past day; the local date when unset.
    pub today: Option<NaiveDate>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let source = match lookup("DASHBOARD_BASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => SourceConfig::Http(url.trim().trim_end_matches('/').to_string()),
            None => SourceConfig::Files(PathBuf::from(
                lookup("DASHBOARD_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            )),
        };

        let default_device = lookup("DASHBOARD_DEVICE")
            .map(|device| device.trim().to_string())
            .filter(|device| !device.is_empty())
            .unwrap_or_else(|| DEFAULT_DEVICE.to_string());

        Self {
            port,
            source,
            default_device,
            cache: switch(lookup("DASHBOARD_CACHE")),
            fallback: switch(lookup("DASHBOARD_FALLBACK")),
            today: lookup("DASHBOARD_TODAY")
                .and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()),
        }
    }
}

fn switch(value: Option<String>) -> bool {
    match value {
        Some(value) => !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "off" | "no"
        ),
        None => true,
    }
}
