//! Error types for loading, filtering and summarizing trip data.

use thiserror::Error;

/// The error type for every fallible operation in the library.
///
/// `UnknownCity`, `UnknownMonth`, `UnknownDay` and `EmptyResult` are
/// recoverable: an interactive caller re-collects its filters. `DataFormat`
/// and `SourceUnavailable` abort the query.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// The city name is not one of the known cities.
    #[error("unknown city '{0}'")]
    UnknownCity(String),

    /// The month filter is neither a month name nor "all".
    #[error("unknown month '{0}'")]
    UnknownMonth(String),

    /// The day filter is neither a day name nor "all".
    #[error("unknown day '{0}'")]
    UnknownDay(String),

    /// The backing file for a city could not be opened or read.
    #[error("data for {city} unavailable at '{path}': {source}")]
    SourceUnavailable {
        city: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A row or header could not be turned into a trip record.
    #[error("malformed trip data at line {line}: {reason}")]
    DataFormat { line: u64, reason: String },

    /// The filters matched no trips.
    #[error("no data available for the selected filters")]
    EmptyResult,

    /// An aggregate that divides by the trip count was asked for zero trips.
    #[error("statistics are undefined over an empty view")]
    EmptyView,

    /// Low-level CSV failure not attributable to a single row.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl BikeshareError {
    /// Returns `true` for errors an interactive caller recovers from by
    /// asking for new filters.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BikeshareError::UnknownCity(_)
                | BikeshareError::UnknownMonth(_)
                | BikeshareError::UnknownDay(_)
                | BikeshareError::EmptyResult
        )
    }
}

pub type Result<T> = std::result::Result<T, BikeshareError>;
