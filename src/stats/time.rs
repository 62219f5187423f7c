use chrono::Weekday;

use crate::city::{WEEKDAYS, day_name};
use crate::error::{BikeshareError, Result};
use crate::filter::FilteredView;
use crate::stats::frequency::{FrequencyTable, mode, value_counts};
use crate::stats::types::{Popular, PopularValue, TimeStats};

/// Most frequent month, day of week and start hour.
///
/// Month and day are only reported when the view spans more than one
/// distinct value; the hour is always reported. Weekday ties go to the
/// earlier day, Monday first.
#[tracing::instrument(name = "time_stats", skip_all, fields(trips = view.len()))]
pub fn time_stats(view: &FilteredView<'_>) -> Result<TimeStats> {
    let months = value_counts(view.iter().map(|t| t.derived.month));
    let days = value_counts(view.iter().map(|t| t.derived.weekday.num_days_from_monday()));
    let hours = value_counts(view.iter().map(|t| t.derived.hour));

    let (hour, hour_count) = mode(&hours).ok_or(BikeshareError::EmptyView)?;

    Ok(TimeStats {
        popular_month: spread(&months, |m| m),
        popular_day: spread(&days, |d| day_name(weekday(d)).to_string()),
        popular_hour: Popular {
            value: hour,
            count: hour_count,
        },
    })
}

fn spread<K, T>(table: &FrequencyTable<K>, label: impl Fn(K) -> T) -> PopularValue<T>
where
    K: Ord + Clone,
{
    if table.len() <= 1 {
        return PopularValue::OnlyOneSelected;
    }
    match mode(table) {
        Some((value, count)) => PopularValue::MostCommon(Popular {
            value: label(value),
            count,
        }),
        None => PopularValue::OnlyOneSelected,
    }
}

fn weekday(days_from_monday: u32) -> Weekday {
    WEEKDAYS[days_from_monday as usize % 7]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{City, MonthFilter};
    use crate::filter::{FilterCriteria, filter};
    use crate::record::{ColumnPresence, RecordStore, TripRecord};
    use chrono::NaiveDate;

    fn trip(month: u32, day: u32, hour: u32) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, month, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap();
        TripRecord {
            start_time: start,
            end_time: start,
            start_station: "A".into(),
            end_station: "B".into(),
            trip_duration: 1,
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    #[test]
    fn test_popular_month_day_hour() {
        // Jan 2 / Jan 9 Mondays, Feb 7 Tuesday
        let store = RecordStore::new(
            vec![trip(1, 2, 8), trip(1, 9, 8), trip(2, 7, 9)],
            ColumnPresence::default(),
        );
        let view = filter(&store, &FilterCriteria::new(City::Chicago));
        let stats = time_stats(&view).unwrap();

        assert_eq!(
            stats.popular_month,
            PopularValue::MostCommon(Popular { value: 1, count: 2 })
        );
        assert_eq!(
            stats.popular_day,
            PopularValue::MostCommon(Popular {
                value: "Monday".to_string(),
                count: 2
            })
        );
        assert_eq!(stats.popular_hour, Popular { value: 8, count: 2 });
    }

    #[test]
    fn test_single_month_is_suppressed() {
        let store = RecordStore::new(
            vec![trip(3, 1, 7), trip(3, 2, 7), trip(4, 3, 7)],
            ColumnPresence::default(),
        );
        let criteria = FilterCriteria::new(City::Chicago).with_month(MonthFilter::Month(3));
        let view = filter(&store, &criteria);
        let stats = time_stats(&view).unwrap();

        assert_eq!(stats.popular_month, PopularValue::OnlyOneSelected);
        // Mar 1 Wednesday, Mar 2 Thursday
        assert_eq!(
            stats.popular_day,
            PopularValue::MostCommon(Popular {
                value: "Wednesday".to_string(),
                count: 1
            })
        );
        assert_eq!(stats.popular_hour.value, 7);
    }

    #[test]
    fn test_single_trip_still_reports_hour() {
        let store = RecordStore::new(vec![trip(5, 5, 23)], ColumnPresence::default());
        let view = filter(&store, &FilterCriteria::new(City::Chicago));
        let stats = time_stats(&view).unwrap();

        assert_eq!(stats.popular_month, PopularValue::OnlyOneSelected);
        assert_eq!(stats.popular_day, PopularValue::OnlyOneSelected);
        assert_eq!(stats.popular_hour, Popular { value: 23, count: 1 });
    }

    #[test]
    fn test_empty_view_is_an_error() {
        let store = RecordStore::default();
        let view = filter(&store, &FilterCriteria::new(City::Chicago));
        assert!(matches!(time_stats(&view), Err(BikeshareError::EmptyView)));
    }
}
