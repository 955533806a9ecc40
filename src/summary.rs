use crate::loader::SummaryLoader;
use crate::models::{AveragePerDay, MonthSummary, Percent, Totals, YearSummary};
use crate::range::month_days;
use crate::source::{SummarySource, day_key};

/// Integer percentages that add up to exactly 100 (largest remainder): each
/// share is floored, then the shares that lost the most get one point each
/// until the sum is 100. An empty split is all zero.
pub fn pct_round(totals: &Totals) -> Percent {
    let counts = [totals.good, totals.meh, totals.bad];
    let total: f64 = counts.iter().map(|value| *value as f64).sum();
    if total == 0.0 {
        return Percent::default();
    }

    let raw = counts.map(|value| value as f64 * 100.0 / total);
    let mut rounded = raw.map(|value| value.floor().clamp(0.0, 100.0) as u8);
    let floored: u16 = rounded.iter().map(|value| u16::from(*value)).sum();
    let diff = 100u16.saturating_sub(floored) as usize;

    let mut order = [0usize, 1, 2];
    order.sort_by(|a, b| {
        let lost_a = raw[*a] - f64::from(rounded[*a]);
        let lost_b = raw[*b] - f64::from(rounded[*b]);
        lost_b.total_cmp(&lost_a)
    });
    for idx in order.into_iter().take(diff) {
        rounded[idx] += 1;
    }

    Percent {
        good: rounded[0],
        meh: rounded[1],
        bad: rounded[2],
    }
}

pub async fn year_summary<S: SummarySource>(
    loader: &SummaryLoader<S>,
    device_id: &str,
    year: i32,
) -> YearSummary {
    let mut totals = Totals::default();
    let mut days_with_data = 0u32;
    let mut months = Vec::with_capacity(12);

    for month in 1..=12 {
        let mut month_totals = Totals::default();
        let mut month_days_with_data = 0u32;
        for date in month_days(year, month) {
            if let Some(summary) = loader.load(&day_key(device_id, date)).await {
                month_totals.add(&summary);
                month_days_with_data += 1;
            }
        }

        totals.merge(&month_totals);
        days_with_data += month_days_with_data;

        months.push(MonthSummary {
            month,
            totals: month_totals,
            days_with_data: month_days_with_data,
            avg_per_day: per_day(&month_totals, month_days_with_data),
            percent: pct_round(&month_totals),
        });
    }

    YearSummary {
        device_id: device_id.to_string(),
        year,
        totals,
        days_with_data,
        avg_per_day: per_day(&totals, days_with_data),
        percent: pct_round(&totals),
        months,
    }
}

fn per_day(totals: &Totals, days: u32) -> AveragePerDay {
    let denom = if days == 0 { 1.0 } else { f64::from(days) };
    AveragePerDay {
        good: totals.good as f64 / denom,
        meh: totals.meh as f64 / denom,
        bad: totals.bad as f64 / denom,
    }
}
