use crate::filter::FilteredView;
use crate::record::OptionalColumn;
use crate::stats::frequency::{mode, value_counts};
use crate::stats::types::{BirthYearStats, CategoryCounts, ColumnBreakdown, Popular, UserStats};

/// Bucket label for empty cells in a column the source does have.
pub const NO_SET: &str = "no set";

/// Which optional columns get a frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemographicColumns(pub Vec<OptionalColumn>);

impl Default for DemographicColumns {
    fn default() -> Self {
        Self(vec![OptionalColumn::UserType, OptionalColumn::Gender])
    }
}

/// Rider breakdown per configured column plus birth-year range and mode.
#[tracing::instrument(name = "user_stats", skip_all, fields(trips = view.len()))]
pub fn user_stats(view: &FilteredView<'_>, columns: &DemographicColumns) -> UserStats {
    UserStats {
        breakdowns: columns
            .0
            .iter()
            .map(|&column| ColumnBreakdown {
                column,
                counts: category_counts(view, column),
            })
            .collect(),
        birth_year: birth_year_stats(view),
    }
}

/// Counts each value of `column`, empty cells under [`NO_SET`].
/// A column the source lacks is not counted at all.
pub fn category_counts(view: &FilteredView<'_>, column: OptionalColumn) -> CategoryCounts {
    if !view.store().columns().has(column) {
        return CategoryCounts::NoInformation;
    }
    CategoryCounts::Counts(value_counts(view.iter().map(|t| {
        t.record
            .optional_value(column)
            .unwrap_or_else(|| NO_SET.to_string())
    })))
}

/// Earliest, most recent and most common birth year.
///
/// `NotGiven` when the column is absent, or when no trip in the view has a
/// birth year.
pub fn birth_year_stats(view: &FilteredView<'_>) -> BirthYearStats {
    if !view.store().columns().has(OptionalColumn::BirthYear) {
        return BirthYearStats::NotGiven;
    }
    let years = value_counts(view.iter().filter_map(|t| t.record.birth_year));

    let (Some((&earliest, _)), Some((&most_recent, _)), Some((common, count))) =
        (years.first_key_value(), years.last_key_value(), mode(&years))
    else {
        return BirthYearStats::NotGiven;
    };

    BirthYearStats::Years {
        earliest,
        most_recent,
        most_common: Popular {
            value: common,
            count,
        },
    }
}
