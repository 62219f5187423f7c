//! Runs a full query: load the city, filter, then compute every statistic.

use tracing::{debug, info};

use crate::city::{City, DayFilter, MonthFilter};
use crate::error::{BikeshareError, Result};
use crate::filter::{FilterCriteria, FilteredView, filter};
use crate::loader::TripSource;
use crate::record::RecordStore;
use crate::stats::{DemographicColumns, StatisticsResult};

/// The filtered trips and their statistics.
#[derive(Debug)]
pub struct QueryOutcome<'a> {
    pub view: FilteredView<'a>,
    pub stats: StatisticsResult,
}

impl QueryOutcome<'_> {
    pub fn trip_count(&self) -> usize {
        self.view.len()
    }
}

/// Answers queries against one city at a time.
///
/// The city's [`RecordStore`] is kept between queries for the same city and
/// rebuilt from the source whenever a different city is asked for.
pub struct Explorer<S> {
    source: S,
    columns: DemographicColumns,
    current: Option<(City, RecordStore)>,
}

impl<S: TripSource> Explorer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            columns: DemographicColumns::default(),
            current: None,
        }
    }

    /// Overrides which columns get a demographic breakdown.
    pub fn with_demographics(mut self, columns: DemographicColumns) -> Self {
        self.columns = columns;
        self
    }

    /// City whose trips are currently loaded.
    pub fn loaded_city(&self) -> Option<City> {
        self.current.as_ref().map(|(city, _)| *city)
    }

    /// Parses the three filter strings and runs [`Explorer::run_query`].
    ///
    /// # Errors
    ///
    /// `UnknownCity`, `UnknownMonth` or `UnknownDay` for strings outside the
    /// known sets, plus everything `run_query` returns.
    pub fn run(&mut self, city: &str, month: &str, day: &str) -> Result<QueryOutcome<'_>> {
        let criteria = FilterCriteria {
            city: city.parse::<City>()?,
            month: month.parse::<MonthFilter>()?,
            day: day.parse::<DayFilter>()?,
        };
        self.run_query(&criteria)
    }

    /// Loads (or reuses) the city's trips, filters them and computes all
    /// statistics.
    ///
    /// # Errors
    ///
    /// [`BikeshareError::EmptyResult`] when no trip matches; statistics are
    /// not computed in that case. Load failures are passed through.
    #[tracing::instrument(skip_all, fields(city = %criteria.city, month = %criteria.month, day = %criteria.day))]
    pub fn run_query(&mut self, criteria: &FilterCriteria) -> Result<QueryOutcome<'_>> {
        let store = load_city(&mut self.current, &self.source, criteria.city)?;
        let view = filter(store, criteria);

        if view.is_empty() {
            info!("No trips match the filters");
            return Err(BikeshareError::EmptyResult);
        }

        let stats = StatisticsResult::compute(&view, &self.columns)?;
        info!(trips = view.len(), "Query complete");
        Ok(QueryOutcome { view, stats })
    }
}

fn load_city<'a, S: TripSource>(
    current: &'a mut Option<(City, RecordStore)>,
    source: &S,
    city: City,
) -> Result<&'a RecordStore> {
    let loaded = match current.take() {
        Some((loaded_city, store)) if loaded_city == city => {
            debug!(%city, "Reusing loaded trips");
            (loaded_city, store)
        }
        _ => (city, source.load(city)?),
    };
    Ok(&current.insert(loaded).1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ColumnPresence, TripRecord};
    use crate::stats::{PopularValue, StationPair};
    use chrono::NaiveDate;
    use std::cell::Cell;

    /// Serves the same three trips for every city and counts loads.
    struct FixedSource {
        loads: Cell<usize>,
    }

    impl TripSource for FixedSource {
        fn load(&self, _city: City) -> Result<RecordStore> {
            self.loads.set(self.loads.get() + 1);
            Ok(RecordStore::new(
                vec![
                    trip(1, 2, 8, "A", "B", 300),
                    trip(1, 2, 8, "A", "B", 100),
                    trip(2, 7, 9, "A", "C", 200),
                ],
                ColumnPresence::default(),
            ))
        }
    }

    fn trip(month: u32, day: u32, hour: u32, start: &str, end: &str, secs: u64) -> TripRecord {
        let at = NaiveDate::from_ymd_opt(2017, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TripRecord {
            start_time: at,
            end_time: at,
            start_station: start.into(),
            end_station: end.into(),
            trip_duration: secs,
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    fn explorer() -> Explorer<FixedSource> {
        Explorer::new(FixedSource {
            loads: Cell::new(0),
        })
    }

    #[test]
    fn test_end_to_end_all_all() {
        let mut explorer = explorer();
        let outcome = explorer.run("chicago", "all", "all").unwrap();
        let stats = &outcome.stats;

        assert_eq!(outcome.trip_count(), 3);
        assert_eq!(stats.trip_count, 3);
        assert_eq!(stats.time.popular_hour.value, 8);
        match &stats.time.popular_month {
            PopularValue::MostCommon(p) => assert_eq!(p.value, 1),
            PopularValue::OnlyOneSelected => panic!("two months in view"),
        }
        assert_eq!(
            stats.stations.popular_trip,
            StationPair {
                start: "A".into(),
                end: "B".into(),
                count: 2
            }
        );
        assert_eq!(stats.duration.total_seconds, 600);
        assert_eq!(stats.duration.mean_seconds, 200.0);
    }

    #[test]
    fn test_empty_result_short_circuits() {
        let mut explorer = explorer();
        let err = explorer.run("chicago", "june", "all").unwrap_err();
        assert!(matches!(err, BikeshareError::EmptyResult));
    }

    #[test]
    fn test_unknown_inputs() {
        let mut explorer = explorer();
        assert!(matches!(
            explorer.run("boston", "all", "all"),
            Err(BikeshareError::UnknownCity(_))
        ));
        assert!(matches!(
            explorer.run("chicago", "smarch", "all"),
            Err(BikeshareError::UnknownMonth(_))
        ));
        assert!(matches!(
            explorer.run("chicago", "all", "funday"),
            Err(BikeshareError::UnknownDay(_))
        ));
        assert_eq!(explorer.source.loads.get(), 0);
    }

    #[test]
    fn test_store_reused_until_city_changes() {
        let mut explorer = explorer();
        explorer.run("chicago", "all", "all").unwrap();
        explorer.run("chicago", "january", "monday").unwrap();
        assert_eq!(explorer.source.loads.get(), 1);

        explorer.run("washington", "all", "all").unwrap();
        assert_eq!(explorer.source.loads.get(), 2);
        assert_eq!(explorer.loaded_city(), Some(City::Washington));
    }

    #[test]
    fn test_demographic_columns_override() {
        use crate::record::OptionalColumn;
        use crate::stats::CategoryCounts;

        let mut explorer =
            explorer().with_demographics(DemographicColumns(vec![OptionalColumn::Gender]));
        let outcome = explorer.run("chicago", "all", "all").unwrap();
        let breakdowns = &outcome.stats.users.breakdowns;

        assert_eq!(breakdowns.len(), 1);
        assert_eq!(breakdowns[0].column, OptionalColumn::Gender);
        // the fixed source declares no optional columns
        assert_eq!(breakdowns[0].counts, CategoryCounts::NoInformation);
    }
}
