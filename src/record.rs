//! In-memory trip records and the fields derived from their start time.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::city::day_name;

/// One trip as read from a city's log.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    /// Whole seconds.
    pub trip_duration: u64,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl TripRecord {
    /// Value of an optional column rendered as text, `None` when missing.
    pub fn optional_value(&self, column: OptionalColumn) -> Option<String> {
        match column {
            OptionalColumn::UserType => self.user_type.clone(),
            OptionalColumn::Gender => self.gender.clone(),
            OptionalColumn::BirthYear => self.birth_year.map(|y| y.to_string()),
        }
    }
}

/// Time fields computed once from a trip's start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedFields {
    /// 1..=12
    pub month: u32,
    pub weekday: Weekday,
    /// 0..=23
    pub hour: u32,
}

impl DerivedFields {
    pub fn from_start(start: &NaiveDateTime) -> Self {
        Self {
            month: start.month(),
            weekday: start.weekday(),
            hour: start.hour(),
        }
    }

    pub fn day_name(&self) -> &'static str {
        day_name(self.weekday)
    }
}

/// A record paired with its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub record: TripRecord,
    pub derived: DerivedFields,
}

/// Columns a city's log may or may not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OptionalColumn {
    UserType,
    Gender,
    BirthYear,
}

impl OptionalColumn {
    pub const ALL: [OptionalColumn; 3] = [
        OptionalColumn::UserType,
        OptionalColumn::Gender,
        OptionalColumn::BirthYear,
    ];

    /// Exact CSV header name.
    pub fn header(self) -> &'static str {
        match self {
            OptionalColumn::UserType => "User Type",
            OptionalColumn::Gender => "Gender",
            OptionalColumn::BirthYear => "Birth Year",
        }
    }
}

/// Which optional columns the source header contained.
///
/// A column that is absent here is reported as "no information given"; a
/// present column with empty cells gets a "no set" bucket instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnPresence {
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

impl ColumnPresence {
    pub fn all() -> Self {
        Self {
            user_type: true,
            gender: true,
            birth_year: true,
        }
    }

    pub fn has(&self, column: OptionalColumn) -> bool {
        match column {
            OptionalColumn::UserType => self.user_type,
            OptionalColumn::Gender => self.gender,
            OptionalColumn::BirthYear => self.birth_year,
        }
    }

    pub fn set(&mut self, column: OptionalColumn, present: bool) {
        match column {
            OptionalColumn::UserType => self.user_type = present,
            OptionalColumn::Gender => self.gender = present,
            OptionalColumn::BirthYear => self.birth_year = present,
        }
    }
}

/// Every trip of one city, in source order.
///
/// Built once per city selection. Derived fields are computed here and never
/// change afterwards; a new record set means a new store.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    trips: Vec<Trip>,
    columns: ColumnPresence,
}

impl RecordStore {
    pub fn new(records: Vec<TripRecord>, columns: ColumnPresence) -> Self {
        let trips = records
            .into_iter()
            .map(|record| Trip {
                derived: DerivedFields::from_start(&record.start_time),
                record,
            })
            .collect();
        Self { trips, columns }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trip> {
        self.trips.get(index)
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn columns(&self) -> ColumnPresence {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 15, 0)
            .unwrap()
    }

    fn record(start: NaiveDateTime) -> TripRecord {
        TripRecord {
            start_time: start,
            end_time: start,
            start_station: "A".into(),
            end_station: "B".into(),
            trip_duration: 60,
            user_type: None,
            gender: Some("Female".into()),
            birth_year: Some(1985),
        }
    }

    #[test]
    fn test_derived_fields_from_start() {
        // 2017-01-02 was a Monday
        let d = DerivedFields::from_start(&at(2017, 1, 2, 8));
        assert_eq!(d.month, 1);
        assert_eq!(d.weekday, Weekday::Mon);
        assert_eq!(d.day_name(), "Monday");
        assert_eq!(d.hour, 8);
    }

    #[test]
    fn test_store_derives_every_record() {
        let store = RecordStore::new(
            vec![record(at(2017, 3, 5, 23)), record(at(2017, 6, 30, 0))],
            ColumnPresence::all(),
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().derived.month, 3);
        assert_eq!(store.get(0).unwrap().derived.weekday, Weekday::Sun);
        assert_eq!(store.get(1).unwrap().derived.hour, 0);
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_optional_value() {
        let r = record(at(2017, 1, 2, 8));
        assert_eq!(r.optional_value(OptionalColumn::UserType), None);
        assert_eq!(
            r.optional_value(OptionalColumn::Gender).as_deref(),
            Some("Female")
        );
        assert_eq!(
            r.optional_value(OptionalColumn::BirthYear).as_deref(),
            Some("1985")
        );
    }

    #[test]
    fn test_column_presence() {
        let mut cols = ColumnPresence::default();
        assert!(!cols.has(OptionalColumn::Gender));
        cols.set(OptionalColumn::Gender, true);
        assert!(cols.has(OptionalColumn::Gender));
        assert!(!cols.has(OptionalColumn::BirthYear));
        assert!(ColumnPresence::all().has(OptionalColumn::UserType));
    }
}
