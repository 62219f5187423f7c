//! Interactive exploration: ask for filters, print statistics, page through
//! the matching trips, repeat.

use std::io::{BufRead, Write};
use std::ops::Range;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::city::{City, DayFilter, MONTH_NAMES, MonthFilter, WEEKDAYS, day_name};
use crate::filter::{FilterCriteria, FilteredView};
use crate::loader::TripSource;
use crate::output::{write_page, write_report};
use crate::query::Explorer;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Walks a view `page_size` rows at a time.
#[derive(Debug, Clone)]
pub struct Pager {
    page_size: usize,
    next: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            next: 0,
        }
    }

    /// Range of the next page, `None` once `total` rows have been handed out.
    pub fn next_range(&mut self, total: usize) -> Option<Range<usize>> {
        if self.next >= total {
            return None;
        }
        let start = self.next;
        let end = (start + self.page_size).min(total);
        self.next = end;
        Some(start..end)
    }

    /// Range of the 1-based `page`, `None` once it starts past `total`.
    /// Does not move the pager.
    pub fn page_range(&self, page: usize, total: usize) -> Option<Range<usize>> {
        let start = (page.max(1) - 1).checked_mul(self.page_size)?;
        if start >= total {
            return None;
        }
        Some(start..start.saturating_add(self.page_size).min(total))
    }
}

/// An interactive session reading answers from `input` and writing to
/// `output`.
pub struct Session<R, W, S> {
    input: R,
    output: W,
    explorer: Explorer<S>,
    page_size: usize,
}

impl<R: BufRead, W: Write, S: TripSource> Session<R, W, S> {
    pub fn new(input: R, output: W, explorer: Explorer<S>) -> Self {
        Self {
            input,
            output,
            explorer,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Runs until the operator declines to restart or input ends.
    ///
    /// # Errors
    ///
    /// Load failures other than an empty result, and I/O errors on the
    /// terminal.
    pub fn run(&mut self) -> Result<()> {
        let Session {
            input,
            output,
            explorer,
            page_size,
        } = self;

        writeln!(output, "Hello! Let's explore some US bikeshare data!")?;

        loop {
            let Some(criteria) = ask_filters(input, output)? else {
                break;
            };
            writeln!(
                output,
                "Calculating for city: {} in month: {} for day: {}",
                criteria.city, criteria.month, criteria.day
            )?;

            match explorer.run_query(&criteria) {
                Ok(outcome) => {
                    write_report(output, &outcome.stats)?;
                    if !page_rows(input, output, &outcome.view, *page_size)? {
                        break;
                    }
                }
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "Query returned nothing");
                    writeln!(output, "No data available - please try again")?;
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("query for {} failed", criteria.city));
                }
            }

            let answer = ask(
                input,
                output,
                "\nWould you like to restart? Enter any key or \"no\" to exit.",
            )?;
            if answer.is_none_or(|a| a.eq_ignore_ascii_case("no")) {
                break;
            }
        }

        info!("Session finished");
        Ok(())
    }
}

/// Asks for city, month and day. `None` if input ends first.
fn ask_filters<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<FilterCriteria>> {
    let cities: Vec<&str> = City::ALL.iter().map(|c| c.name()).collect();
    let Some(city) = ask_choice::<City, _, _>(input, output, "city", &cities)? else {
        return Ok(None);
    };
    let mut months: Vec<&str> = MONTH_NAMES.to_vec();
    months.push("all");
    let Some(month) = ask_choice::<MonthFilter, _, _>(input, output, "month", &months)? else {
        return Ok(None);
    };
    let day_names: Vec<String> = WEEKDAYS.iter().map(|d| day_name(*d).to_lowercase()).collect();
    let mut days: Vec<&str> = day_names.iter().map(String::as_str).collect();
    days.push("all");
    let Some(day) = ask_choice::<DayFilter, _, _>(input, output, "day of week", &days)? else {
        return Ok(None);
    };
    Ok(Some(FilterCriteria { city, month, day }))
}

/// Re-asks until the answer parses.
fn ask_choice<T, R, W>(input: &mut R, output: &mut W, what: &str, options: &[&str]) -> Result<Option<T>>
where
    T: FromStr,
    R: BufRead,
    W: Write,
{
    loop {
        let Some(answer) = ask(input, output, &format!("\nPlease insert {what}:"))? else {
            return Ok(None);
        };
        match answer.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => writeln!(
                output,
                "Unknown {what}! Please take one of: {}",
                options.join(", ")
            )?,
        }
    }
}

/// Shows pages of the view while the operator keeps asking.
/// Returns `false` if input ended.
fn page_rows<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    view: &FilteredView<'_>,
    page_size: usize,
) -> Result<bool> {
    let mut pager = Pager::new(page_size);
    let mut question = format!(
        "\nWould you like to view {page_size} rows of individual trip data? \
         Press enter to continue or \"no\" to stop."
    );

    loop {
        let Some(answer) = ask(input, output, &question)? else {
            return Ok(false);
        };
        if answer.eq_ignore_ascii_case("no") {
            return Ok(true);
        }
        match pager.next_range(view.len()) {
            Some(range) => {
                write_page(output, view, range)?;
            }
            None => {
                writeln!(output, "You have already seen all trip data")?;
                return Ok(true);
            }
        }
        question = "Do you wish to see more?".to_string();
    }
}

/// Prints `question` and reads one trimmed line. `None` at end of input.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<Option<String>> {
    writeln!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("reading answer")? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
