use crate::errors::FetchError;
use crate::models::{DailySummary, SensorDay};
use crate::source::SummarySource;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Normalizes both uploaded shapes: sensor values nested under
/// `avg_sensor_day` or flattened onto the top level. Nested wins.
pub fn parse_summary(key: &str, bytes: &[u8]) -> Result<DailySummary, FetchError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| FetchError::MalformedJson {
        key: key.to_string(),
        source,
    })?;

    let Value::Object(root) = value else {
        return Err(FetchError::MissingField {
            key: key.to_string(),
            field: "good",
        });
    };
    let nested = match root.get("avg_sensor_day") {
        Some(Value::Object(nested)) => Some(nested),
        _ => None,
    };

    let sensor = |field: &'static str| -> Result<Option<f64>, FetchError> {
        if let Some(value) = nested.and_then(|nested| number(key, nested, field).transpose()) {
            return value.map(Some);
        }
        number(key, &root, field)
    };
    let counter = |field: &'static str| -> Result<u64, FetchError> {
        Ok(number(key, &root, field)?.map(to_count).unwrap_or(0))
    };

    let count = match nested.map(|nested| number(key, nested, "count")).transpose()? {
        Some(Some(count)) => to_count(count),
        _ => number(key, &root, "count")?.map(to_count).unwrap_or(0),
    };

    Ok(DailySummary {
        good: counter("good")?,
        meh: counter("meh")?,
        bad: counter("bad")?,
        avg_sensor: SensorDay {
            temp: sensor("temp")?,
            db: sensor("db")?,
            co2: sensor("co2")?,
            voc: sensor("voc")?,
        },
        count,
    })
}

fn number(key: &str, object: &Map<String, Value>, field: &'static str) -> Result<Option<f64>, FetchError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        Some(Value::String(text)) => text.trim().parse::<f64>().map(Some).map_err(|_| {
            FetchError::MissingField {
                key: key.to_string(),
                field,
            }
        }),
        Some(_) => Err(FetchError::MissingField {
            key: key.to_string(),
            field,
        }),
    }
}

fn to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

pub struct SummaryLoader<S> {
    source: S,
    cache: Option<Mutex<HashMap<String, DailySummary>>>,
}

impl<S: SummarySource> SummaryLoader<S> {
    pub fn new(source: S, cache: bool) -> Self {
        Self {
            source,
            cache: cache.then(|| Mutex::new(HashMap::new())),
        }
    }

    /// Any failure is logged and reported as "no data".
    pub async fn load(&self, key: &str) -> Option<DailySummary> {
        if let Some(cache) = &self.cache {
            if let Some(summary) = cache.lock().await.get(key) {
                debug!("cache hit for {key}");
                return Some(summary.clone());
            }
        }

        let result = match self.source.fetch(key).await {
            Ok(bytes) => parse_summary(key, &bytes),
            Err(err) => Err(err),
        };

        match result {
            Ok(summary) => {
                if let Some(cache) = &self.cache {
                    cache.lock().await.insert(key.to_string(), summary.clone());
                }
                Some(summary)
            }
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }
}
