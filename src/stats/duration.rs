use crate::error::{BikeshareError, Result};
use crate::filter::FilteredView;
use crate::stats::frequency::mean;
use crate::stats::types::DurationStats;

/// Total, count and mean trip duration.
///
/// # Errors
///
/// [`BikeshareError::EmptyView`] when the view has no trips, since the mean
/// is undefined.
#[tracing::instrument(name = "duration_stats", skip_all, fields(trips = view.len()))]
pub fn duration_stats(view: &FilteredView<'_>) -> Result<DurationStats> {
    // u128 holds the sum of any number of u64 durations
    let total_seconds: u128 = view.iter().map(|t| u128::from(t.record.trip_duration)).sum();
    let trip_count = view.len();
    let mean_seconds = mean(total_seconds as f64, trip_count).ok_or(BikeshareError::EmptyView)?;

    Ok(DurationStats {
        total_seconds,
        trip_count,
        mean_seconds,
    })
}
