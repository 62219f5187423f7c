//! Result types produced by the statistics routines.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::OptionalColumn;

/// A value together with how many trips had it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

/// Most common value of a dimension that a filter may have pinned to a
/// single value, in which case there is nothing to report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopularValue<T> {
    MostCommon(Popular<T>),
    OnlyOneSelected,
}

/// Most popular month, day of week and start hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// 1-based month number.
    pub popular_month: PopularValue<u32>,
    pub popular_day: PopularValue<String>,
    pub popular_hour: Popular<u32>,
}

/// An ordered start → end station combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub popular_start_station: Popular<String>,
    pub popular_end_station: Popular<String>,
    pub popular_trip: StationPair,
}

/// Trip duration totals, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: u128,
    pub trip_count: usize,
    pub mean_seconds: f64,
}

/// Frequency table of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryCounts {
    /// The source has no such column.
    NoInformation,
    /// Counts per value; missing cells are counted under `"no set"`.
    Counts(BTreeMap<String, usize>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnBreakdown {
    pub column: OptionalColumn,
    pub counts: CategoryCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BirthYearStats {
    NotGiven,
    Years {
        earliest: i32,
        most_recent: i32,
        most_common: Popular<i32>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub breakdowns: Vec<ColumnBreakdown>,
    pub birth_year: BirthYearStats,
}

/// Everything computed for one query. Built fresh each time, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsResult {
    pub trip_count: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub duration: DurationStats,
    pub users: UserStats,
}
