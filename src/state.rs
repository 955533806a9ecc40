use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::loader::SummaryLoader;
use crate::source::Source;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<SummaryLoader<Source>>,
    pub dashboard: Arc<Dashboard>,
    pub default_device: String,
    pub fallback: bool,
    pub pinned_today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            loader: Arc::new(SummaryLoader::new(
                Source::from_config(&config.source),
                config.cache,
            )),
            dashboard: Arc::new(Dashboard::default()),
            default_device: config.default_device.clone(),
            fallback: config.fallback,
            pinned_today: config.today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| Local::now().date_naive())
    }
}
