use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Now,
    Day,
    Week,
    Month,
    Year,
}

impl Scope {
    pub const ALL: [Scope; 5] = [Scope::Now, Scope::Day, Scope::Week, Scope::Month, Scope::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Now => "now",
            Scope::Day => "day",
            Scope::Week => "week",
            Scope::Month => "month",
            Scope::Year => "year",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "now" => Ok(Scope::Now),
            "day" => Ok(Scope::Day),
            "week" => Ok(Scope::Week),
            "month" => Ok(Scope::Month),
            "year" => Ok(Scope::Year),
            other => Err(format!("unknown scope '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSelection {
    pub scope: Scope,
    pub device_id: String,
}

/// Averaged sensor values of one day. Absent values are not readings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SensorDay {
    pub temp: Option<f64>,
    pub db: Option<f64>,
    pub co2: Option<f64>,
    pub voc: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DailySummary {
    pub good: u64,
    pub meh: u64,
    pub bad: u64,
    pub avg_sensor: SensorDay,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub good: u64,
    pub meh: u64,
    pub bad: u64,
}

impl Totals {
    pub fn add(&mut self, summary: &DailySummary) {
        self.good = self.good.saturating_add(summary.good);
        self.meh = self.meh.saturating_add(summary.meh);
        self.bad = self.bad.saturating_add(summary.bad);
    }

    pub fn merge(&mut self, other: &Totals) {
        self.good = self.good.saturating_add(other.good);
        self.meh = self.meh.saturating_add(other.meh);
        self.bad = self.bad.saturating_add(other.bad);
    }

    pub fn sum(&self) -> u64 {
        self.good
            .saturating_add(self.meh)
            .saturating_add(self.bad)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Percent {
    pub good: u8,
    pub meh: u8,
    pub bad: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    pub temp: f64,
    pub db: i64,
    pub co2: i64,
    pub voc: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeAggregate {
    pub device_id: String,
    pub scope: Scope,
    pub start_date: String,
    pub end_date: String,
    pub totals: Totals,
    pub total: u64,
    pub percent: Percent,
    pub series: Vec<SeriesPoint>,
    pub days_with_data: u32,
    pub averages: Averages,
    pub noise_level: Option<String>,
    pub air_quality: Option<String>,
    pub used_fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct SelectionQuery {
    pub device: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub device: String,
    pub scope: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectResponse {
    pub token: u64,
    pub applied: bool,
    pub aggregate: RangeAggregate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub token: u64,
    pub selection: RangeSelection,
    pub aggregate: RangeAggregate,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub device: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragePerDay {
    pub good: f64,
    pub meh: f64,
    pub bad: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: u32,
    pub totals: Totals,
    pub days_with_data: u32,
    pub avg_per_day: AveragePerDay,
    pub percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub device_id: String,
    pub year: i32,
    pub totals: Totals,
    pub days_with_data: u32,
    pub avg_per_day: AveragePerDay,
    pub percent: Percent,
    pub months: Vec<MonthSummary>,
}
