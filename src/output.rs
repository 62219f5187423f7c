//! Rendering of query results.
//!
//! Supports a plain-text report, JSON serialization, psql-style tables for
//! pages of raw trips, and CSV export of a filtered view.

use std::io::Write;
use std::ops::Range;
use std::path::Path;

use anyhow::Result;
use comfy_table::Table;
use comfy_table::presets::ASCII_FULL_CONDENSED;
use csv::WriterBuilder;
use tracing::{debug, info};

use crate::city::month_name;
use crate::filter::FilteredView;
use crate::record::{ColumnPresence, OptionalColumn, Trip};
use crate::stats::{
    BirthYearStats, CategoryCounts, Popular, PopularValue, StatisticsResult, StationStats,
    TimeStats,
};

const RULE: &str = "----------------------------------------";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes the human-readable statistics report.
pub fn write_report<W: Write>(out: &mut W, stats: &StatisticsResult) -> Result<()> {
    writeln!(out, "We found {} trips.", stats.trip_count)?;
    writeln!(out, "{RULE}")?;
    write_time(out, &stats.time)?;
    write_stations(out, &stats.stations)?;

    writeln!(out, "Trip Duration")?;
    writeln!(
        out,
        "Total travel time: {} seconds in {} trips",
        stats.duration.total_seconds, stats.duration.trip_count
    )?;
    writeln!(
        out,
        "Mean travel time: {:.2} seconds",
        stats.duration.mean_seconds
    )?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "User Stats")?;
    for breakdown in &stats.users.breakdowns {
        let name = breakdown.column.header();
        match &breakdown.counts {
            CategoryCounts::NoInformation => writeln!(out, "No {name} information given!")?,
            CategoryCounts::Counts(counts) => {
                writeln!(out, "{name}:")?;
                for (value, count) in counts {
                    writeln!(out, "  {value:<20}{count}")?;
                }
            }
        }
    }
    match &stats.users.birth_year {
        BirthYearStats::NotGiven => writeln!(out, "No year of birth given!")?,
        BirthYearStats::Years {
            earliest,
            most_recent,
            most_common,
        } => {
            writeln!(out, "Earliest year of birth:     {earliest}")?;
            writeln!(out, "Most recent year of birth:  {most_recent}")?;
            writeln!(out, "Most common year of birth:  {}", counted(most_common))?;
        }
    }
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn write_time<W: Write>(out: &mut W, time: &TimeStats) -> Result<()> {
    writeln!(out, "Most Frequent Times of Travel")?;
    match &time.popular_month {
        PopularValue::MostCommon(p) => writeln!(
            out,
            "Most popular month: {} ({} trips)",
            month_name(p.value),
            p.count
        )?,
        PopularValue::OnlyOneSelected => writeln!(out, "Only one month selected!")?,
    }
    match &time.popular_day {
        PopularValue::MostCommon(p) => writeln!(out, "Most popular day of week: {}", counted(p))?,
        PopularValue::OnlyOneSelected => writeln!(out, "Only one day of week selected!")?,
    }
    writeln!(
        out,
        "Most popular start hour: {}",
        counted(&time.popular_hour)
    )?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn write_stations<W: Write>(out: &mut W, stations: &StationStats) -> Result<()> {
    writeln!(out, "Most Popular Stations and Trip")?;
    writeln!(
        out,
        "Most popular start station: {}",
        counted(&stations.popular_start_station)
    )?;
    writeln!(
        out,
        "Most popular end station: {}",
        counted(&stations.popular_end_station)
    )?;
    let pair = &stations.popular_trip;
    writeln!(
        out,
        "Most popular trip: from {} to {} ({} trips)",
        pair.start, pair.end, pair.count
    )?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn counted<T: std::fmt::Display>(p: &Popular<T>) -> String {
    format!("{} ({} trips)", p.value, p.count)
}

/// Serializes the statistics as pretty-printed JSON.
pub fn to_json(stats: &StatisticsResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}

/// Column headers for raw trip rows, optional ones only when the source has
/// them.
pub fn row_headers(columns: ColumnPresence) -> Vec<&'static str> {
    let mut headers = vec![
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
    ];
    headers.extend(
        OptionalColumn::ALL
            .into_iter()
            .filter(|c| columns.has(*c))
            .map(OptionalColumn::header),
    );
    headers
}

/// Cell values of a trip, matching [`row_headers`]. Missing values are empty.
pub fn row_fields(trip: &Trip, columns: ColumnPresence) -> Vec<String> {
    let r = &trip.record;
    let mut fields = vec![
        r.start_time.format(TIMESTAMP_FORMAT).to_string(),
        r.end_time.format(TIMESTAMP_FORMAT).to_string(),
        r.trip_duration.to_string(),
        r.start_station.clone(),
        r.end_station.clone(),
    ];
    fields.extend(
        OptionalColumn::ALL
            .into_iter()
            .filter(|c| columns.has(*c))
            .map(|c| r.optional_value(c).unwrap_or_default()),
    );
    fields
}

/// Writes the trips at positions `range` of the view as a psql-style table.
/// Returns how many rows were written.
pub fn write_page<W: Write>(
    out: &mut W,
    view: &FilteredView<'_>,
    range: Range<usize>,
) -> Result<usize> {
    let columns = view.store().columns();
    let start = range.start;

    let mut table = Table::new();
    table.load_preset(ASCII_FULL_CONDENSED);
    let mut header = vec![String::new()];
    header.extend(row_headers(columns).into_iter().map(String::from));
    table.set_header(header);

    let mut rows = 0;
    for (i, trip) in view.slice(range).enumerate() {
        let mut row = vec![(start + i).to_string()];
        row.extend(row_fields(trip, columns));
        table.add_row(row);
        rows += 1;
    }

    if rows == 0 {
        return Ok(0);
    }
    writeln!(out, "{table}")?;

    debug!(rows, start, "Page written");
    Ok(rows)
}

/// Writes every trip of the view to a CSV file, replacing any existing
/// file. Returns the number of trips written.
pub fn export_view(path: impl AsRef<Path>, view: &FilteredView<'_>) -> Result<usize> {
    let path = path.as_ref();
    let columns = view.store().columns();

    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(row_headers(columns))?;
    for trip in view.iter() {
        writer.write_record(row_fields(trip, columns))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = view.len(), "Filtered trips exported");
    Ok(view.len())
}
