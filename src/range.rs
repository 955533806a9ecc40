use crate::models::Scope;
use chrono::{Datelike, Duration, NaiveDate};

const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];

/// Calendar dates covered by `scope`, oldest first. Day and week stop at
/// `today`; month and year cover the whole period.
pub fn resolve_dates(scope: Scope, today: NaiveDate) -> Vec<NaiveDate> {
    match scope {
        Scope::Now | Scope::Day => vec![today],
        Scope::Week => week_start(today)
            .iter_days()
            .take_while(|date| *date <= today)
            .collect(),
        Scope::Month => month_days(today.year(), today.month()),
        Scope::Year => (1..=12)
            .flat_map(|month| month_days(today.year(), month))
            .collect(),
    }
}

pub fn bucket_labels(scope: Scope, today: NaiveDate) -> Vec<String> {
    match scope {
        Scope::Now | Scope::Day => (0..24).map(|hour| format!("{hour:02}:00")).collect(),
        Scope::Week => WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect(),
        Scope::Month => (1..=days_in_month(today.year(), today.month()))
            .map(|day| day.to_string())
            .collect(),
        Scope::Year => MONTH_LABELS.iter().map(|label| label.to_string()).collect(),
    }
}

pub fn bucket_count(scope: Scope, today: NaiveDate) -> usize {
    match scope {
        Scope::Now | Scope::Day => 24,
        Scope::Week => 7,
        Scope::Month => days_in_month(today.year(), today.month()),
        Scope::Year => 12,
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .into_iter()
        .flat_map(|first| first.iter_days().take_while(move |date| date.month() == month))
        .collect()
}

pub fn days_in_month(year: i32, month: u32) -> usize {
    month_days(year, month).len()
}
