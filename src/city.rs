//! The fixed sets a query is built from: cities, month names and day names.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;

use crate::error::BikeshareError;

/// Lower-case month names, indexed by month number minus one.
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Monday-first weekdays, the order used for day names and tie-breaks.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A city with a bike-share trip log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// The lower-case name an operator types.
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File holding the city's trips, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| BikeshareError::UnknownCity(s.trim().to_string()))
    }
}

/// Restricts trips to one month, or keeps every month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    /// 1-based month number.
    Month(u32),
}

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted == "all" {
            return Ok(MonthFilter::All);
        }
        MONTH_NAMES
            .iter()
            .position(|m| *m == wanted)
            .map(|i| MonthFilter::Month(i as u32 + 1))
            .ok_or_else(|| BikeshareError::UnknownMonth(s.trim().to_string()))
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => f.write_str(&month_name(*m).to_lowercase()),
        }
    }
}

/// Restricts trips to one day of the week, or keeps every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Day(Weekday),
}

impl FromStr for DayFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("all") {
            return Ok(DayFilter::All);
        }
        WEEKDAYS
            .into_iter()
            .find(|d| day_name(*d).eq_ignore_ascii_case(wanted))
            .map(DayFilter::Day)
            .ok_or_else(|| BikeshareError::UnknownDay(wanted.to_string()))
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Day(d) => f.write_str(&day_name(*d).to_lowercase()),
        }
    }
}

/// Title-case month name for a 1-based month number, `"unknown"` out of range.
pub fn month_name(month: u32) -> &'static str {
    const TITLES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    month
        .checked_sub(1)
        .and_then(|i| TITLES.get(i as usize))
        .copied()
        .unwrap_or("unknown")
}

/// Full English day name, e.g. `"Monday"`.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_parse_is_case_insensitive() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!(
            " New York City ".parse::<City>().unwrap(),
            City::NewYorkCity
        );
        assert_eq!(City::Washington.file_name(), "washington.csv");
    }

    #[test]
    fn test_unknown_city() {
        let err = "paris".parse::<City>().unwrap_err();
        assert!(matches!(err, BikeshareError::UnknownCity(ref c) if c == "paris"));
    }

    #[test]
    fn test_month_filter_parse() {
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!(
            "January".parse::<MonthFilter>().unwrap(),
            MonthFilter::Month(1)
        );
        assert_eq!(
            "december".parse::<MonthFilter>().unwrap(),
            MonthFilter::Month(12)
        );
        assert!(matches!(
            "jan".parse::<MonthFilter>(),
            Err(BikeshareError::UnknownMonth(_))
        ));
    }

    #[test]
    fn test_day_filter_parse() {
        assert_eq!("ALL".parse::<DayFilter>().unwrap(), DayFilter::All);
        assert_eq!(
            "monday".parse::<DayFilter>().unwrap(),
            DayFilter::Day(Weekday::Mon)
        );
        assert_eq!(
            "SuNdAy".parse::<DayFilter>().unwrap(),
            DayFilter::Day(Weekday::Sun)
        );
        assert!(matches!(
            "mon".parse::<DayFilter>(),
            Err(BikeshareError::UnknownDay(_))
        ));
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "unknown");
        assert_eq!(month_name(13), "unknown");
    }

    #[test]
    fn test_filter_display_round_trips_names() {
        assert_eq!(MonthFilter::Month(6).to_string(), "june");
        assert_eq!(DayFilter::Day(Weekday::Fri).to_string(), "friday");
        assert_eq!(MonthFilter::default().to_string(), "all");
    }
}
