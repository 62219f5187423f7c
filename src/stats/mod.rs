//! Aggregate statistics over a filtered view of trips.
//!
//! Each routine reads the view and builds its own result; none depends on
//! another. Wherever a "most common" value is asked for, ties are resolved
//! in favour of the smallest key: lowest month or hour, earliest weekday
//! (Monday first), alphabetically first station or station pair, earliest
//! birth year.

pub mod duration;
pub mod frequency;
pub mod station;
pub mod time;
pub mod types;
pub mod user;

pub use duration::duration_stats;
pub use station::station_stats;
pub use time::time_stats;
pub use types::*;
pub use user::{DemographicColumns, NO_SET, user_stats};

use crate::error::Result;
use crate::filter::FilteredView;

impl StatisticsResult {
    /// Runs every routine over `view`.
    ///
    /// # Errors
    ///
    /// [`crate::BikeshareError::EmptyView`] if the view has no trips.
    pub fn compute(view: &FilteredView<'_>, columns: &DemographicColumns) -> Result<Self> {
        Ok(StatisticsResult {
            trip_count: view.len(),
            time: time_stats(view)?,
            stations: station_stats(view)?,
            duration: duration_stats(view)?,
            users: user_stats(view, columns),
        })
    }
}
