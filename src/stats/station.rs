use crate::error::{BikeshareError, Result};
use crate::filter::FilteredView;
use crate::stats::frequency::{mode, value_counts};
use crate::stats::types::{Popular, StationPair, StationStats};

/// Most used start station, end station and start → end combination.
///
/// Pairs are ordered: A → B and B → A are counted separately.
#[tracing::instrument(name = "station_stats", skip_all, fields(trips = view.len()))]
pub fn station_stats(view: &FilteredView<'_>) -> Result<StationStats> {
    let starts = value_counts(view.iter().map(|t| t.record.start_station.as_str()));
    let ends = value_counts(view.iter().map(|t| t.record.end_station.as_str()));
    let pairs = value_counts(
        view.iter()
            .map(|t| (t.record.start_station.as_str(), t.record.end_station.as_str())),
    );

    let (start, start_count) = mode(&starts).ok_or(BikeshareError::EmptyView)?;
    let (end, end_count) = mode(&ends).ok_or(BikeshareError::EmptyView)?;
    let ((pair_start, pair_end), pair_count) = mode(&pairs).ok_or(BikeshareError::EmptyView)?;

    Ok(StationStats {
        popular_start_station: Popular {
            value: start.to_string(),
            count: start_count,
        },
        popular_end_station: Popular {
            value: end.to_string(),
            count: end_count,
        },
        popular_trip: StationPair {
            start: pair_start.to_string(),
            end: pair_end.to_string(),
            count: pair_count,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;
    use crate::filter::{FilterCriteria, filter};
    use crate::record::{ColumnPresence, RecordStore, TripRecord};
    use chrono::NaiveDate;

    fn trip(start: &str, end: &str) -> TripRecord {
        let at = NaiveDate::from_ymd_opt(2017, 4, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        TripRecord {
            start_time: at,
            end_time: at,
            start_station: start.into(),
            end_station: end.into(),
            trip_duration: 1,
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    fn stats_for(trips: Vec<TripRecord>) -> StationStats {
        let store = RecordStore::new(trips, ColumnPresence::default());
        let view = filter(&store, &FilterCriteria::new(City::Chicago));
        station_stats(&view).unwrap()
    }

    #[test]
    fn test_popular_stations_and_pair() {
        let stats = stats_for(vec![trip("A", "B"), trip("A", "B"), trip("A", "C")]);
        assert_eq!(stats.popular_start_station.value, "A");
        assert_eq!(stats.popular_start_station.count, 3);
        assert_eq!(stats.popular_end_station.value, "B");
        assert_eq!(
            stats.popular_trip,
            StationPair {
                start: "A".into(),
                end: "B".into(),
                count: 2
            }
        );
    }

    #[test]
    fn test_pairs_are_ordered() {
        let stats = stats_for(vec![trip("B", "A"), trip("A", "B"), trip("B", "A")]);
        assert_eq!(stats.popular_trip.start, "B");
        assert_eq!(stats.popular_trip.end, "A");
        assert_eq!(stats.popular_trip.count, 2);

        let only_ab = stats_for(vec![trip("A", "B"), trip("A", "B")]);
        assert_eq!(only_ab.popular_trip.start, "A");
        assert_eq!(only_ab.popular_trip.end, "B");
    }

    #[test]
    fn test_station_ties_go_to_smallest_name() {
        let stats = stats_for(vec![trip("Wells St", "Canal St"), trip("Clark St", "Adams St")]);
        assert_eq!(stats.popular_start_station.value, "Clark St");
        assert_eq!(stats.popular_end_station.value, "Adams St");
        assert_eq!(stats.popular_trip.start, "Clark St");
        assert_eq!(stats.popular_trip.count, 1);
    }

    #[test]
    fn test_empty_view_is_an_error() {
        let store = RecordStore::default();
        let view = filter(&store, &FilterCriteria::new(City::Chicago));
        assert!(station_stats(&view).is_err());
    }
}
