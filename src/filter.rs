//! Month and day-of-week filtering over a [`RecordStore`].

use std::ops::Range;

use crate::city::{City, DayFilter, MonthFilter};
use crate::record::{DerivedFields, RecordStore, Trip};

/// What to look at: a city plus month and day restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterCriteria {
    /// Criteria with no month or day restriction.
    pub fn new(city: City) -> Self {
        Self {
            city,
            month: MonthFilter::All,
            day: DayFilter::All,
        }
    }

    pub fn with_month(mut self, month: MonthFilter) -> Self {
        self.month = month;
        self
    }

    pub fn with_day(mut self, day: DayFilter) -> Self {
        self.day = day;
        self
    }

    /// Both restrictions must hold.
    pub fn matches(&self, derived: &DerivedFields) -> bool {
        let month_ok = match self.month {
            MonthFilter::All => true,
            MonthFilter::Month(m) => derived.month == m,
        };
        let day_ok = match self.day {
            DayFilter::All => true,
            DayFilter::Day(d) => derived.weekday == d,
        };
        month_ok && day_ok
    }
}

/// The trips of a store that passed a filter, in store order.
///
/// Holds indices into the store; the store itself is only borrowed.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    store: &'a RecordStore,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every trip in the store.
    pub fn all(store: &'a RecordStore) -> Self {
        Self {
            store,
            indices: (0..store.len()).collect(),
        }
    }

    /// Narrows this view further. Filtering twice by the same criteria
    /// yields the same view.
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        FilteredView {
            store: self.store,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| criteria.matches(&self.store.trips()[i].derived))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The `position`-th trip of the view.
    pub fn get(&self, position: usize) -> Option<&'a Trip> {
        let index = *self.indices.get(position)?;
        self.store.get(index)
    }

    /// Trips in `range`, clamped to the view's length.
    pub fn slice(&self, range: Range<usize>) -> impl Iterator<Item = &'a Trip> + '_ {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.indices[start..end]
            .iter()
            .map(|&i| &self.store.trips()[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Trip> + '_ {
        self.slice(0..self.len())
    }

    pub fn store(&self) -> &'a RecordStore {
        self.store
    }

    /// Store indices backing the view.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.store, other.store) && self.indices == other.indices
    }
}

/// Applies `criteria` to a whole store. The store is not modified and an
/// empty result is a valid view.
#[tracing::instrument(skip_all, fields(rows = store.len(), month = %criteria.month, day = %criteria.day))]
pub fn filter<'a>(store: &'a RecordStore, criteria: &FilterCriteria) -> FilteredView<'a> {
    let view = FilteredView::all(store).refine(criteria);
    tracing::debug!(matched = view.len(), "Filter applied");
    view
}
