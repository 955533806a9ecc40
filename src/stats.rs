use crate::levels::{air_quality, noise_level};
use crate::loader::SummaryLoader;
use crate::models::{Averages, DailySummary, RangeAggregate, RangeSelection, Scope, SeriesPoint, Totals};
use crate::range::{bucket_count, bucket_labels, resolve_dates};
use crate::source::{SummarySource, day_key, fallback_key};
use crate::summary::pct_round;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Loads every date of the selection in order and reduces the result. The
/// department-wide file is only read when no single date had data.
pub async fn aggregate<S: SummarySource>(
    loader: &SummaryLoader<S>,
    selection: &RangeSelection,
    today: NaiveDate,
    use_fallback: bool,
) -> RangeAggregate {
    let dates = resolve_dates(selection.scope, today);
    let mut days = Vec::with_capacity(dates.len());
    for date in dates {
        let summary = loader.load(&day_key(&selection.device_id, date)).await;
        days.push((date, summary));
    }

    let fallback = if use_fallback && days.iter().all(|(_, summary)| summary.is_none()) {
        debug!(
            "no daily data for {} ({}), trying fallback",
            selection.device_id, selection.scope
        );
        loader.load(&fallback_key(&selection.device_id)).await
    } else {
        None
    };

    reduce(selection, today, &days, fallback.as_ref())
}

pub fn reduce(
    selection: &RangeSelection,
    today: NaiveDate,
    days: &[(NaiveDate, Option<DailySummary>)],
    fallback: Option<&DailySummary>,
) -> RangeAggregate {
    let mut totals = Totals::default();
    let mut temp = Mean::default();
    let mut db = Mean::default();
    let mut co2 = Mean::default();
    let mut voc = Mean::default();
    let mut days_with_data = 0u32;

    for summary in days.iter().filter_map(|(_, summary)| summary.as_ref()) {
        days_with_data += 1;
        totals.add(summary);
        temp.push(summary.avg_sensor.temp);
        db.push(summary.avg_sensor.db);
        co2.push(summary.avg_sensor.co2);
        voc.push(summary.avg_sensor.voc);
    }

    let used_fallback = days_with_data == 0 && fallback.is_some();
    if let Some(summary) = fallback.filter(|_| used_fallback) {
        totals.add(summary);
        temp.push(summary.avg_sensor.temp);
        db.push(summary.avg_sensor.db);
        co2.push(summary.avg_sensor.co2);
        voc.push(summary.avg_sensor.voc);
    }

    let averages = Averages {
        temp: (temp.value() * 10.0).round() / 10.0,
        db: db.value().round() as i64,
        co2: co2.value().round() as i64,
        voc: voc.value().round() as i64,
    };

    let values = series_values(selection.scope, today, days);
    let series = bucket_labels(selection.scope, today)
        .into_iter()
        .zip(values)
        .map(|(label, value)| SeriesPoint { label, value })
        .collect();

    let (start_date, end_date) = match (days.first(), days.last()) {
        (Some((first, _)), Some((last, _))) => (first.to_string(), last.to_string()),
        _ => (today.to_string(), today.to_string()),
    };

    RangeAggregate {
        device_id: selection.device_id.clone(),
        scope: selection.scope,
        start_date,
        end_date,
        total: totals.sum(),
        percent: pct_round(&totals),
        totals,
        series,
        days_with_data,
        noise_level: noise_level(averages.db).map(str::to_string),
        air_quality: air_quality(averages.voc).map(str::to_string),
        averages,
        used_fallback,
    }
}

/// One value per bucket, always exactly `bucket_count` long.
fn series_values(
    scope: Scope,
    today: NaiveDate,
    days: &[(NaiveDate, Option<DailySummary>)],
) -> Vec<f64> {
    let len = bucket_count(scope, today);
    let day_temp =
        |summary: &Option<DailySummary>| summary.as_ref().and_then(|s| s.avg_sensor.temp).unwrap_or(0.0);

    let mut values: Vec<f64> = match scope {
        // No hourly data exists; every hour shows the day's mean.
        Scope::Now | Scope::Day => {
            let value = days.first().map(|(_, summary)| day_temp(summary)).unwrap_or(0.0);
            vec![value; len]
        }
        Scope::Week | Scope::Month => days.iter().map(|(_, summary)| day_temp(summary)).collect(),
        Scope::Year => (1..=12)
            .map(|month| {
                let mut mean = Mean::default();
                for (_, summary) in days.iter().filter(|(date, _)| date.month() == month) {
                    mean.push(summary.as_ref().and_then(|s| s.avg_sensor.temp));
                }
                mean.value()
            })
            .collect(),
    };

    values.resize(len, 0.0);
    values
}

#[derive(Debug, Default)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value.filter(|value| value.is_finite()) {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}
