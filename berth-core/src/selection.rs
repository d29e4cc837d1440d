use crate::availability::AvailabilityStore;
use crate::view::SelectedDatesSummary;
use berth_shared::codec::{self, DateKey};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Emitted whenever the selection is replaced or pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged {
    pub count: usize,
    /// `count == number_of_bookings`
    pub complete: bool,
}

/// The dates the visitor has picked but not yet booked, in pick order.
#[derive(Debug, Clone)]
pub struct SelectionState {
    dates: Vec<NaiveDate>,
    capacity: usize,
}

impl SelectionState {
    pub fn new(capacity: usize) -> Self {
        Self {
            dates: Vec::new(),
            capacity,
        }
    }

    /// Store `dates` as the new selection. The picker enforces the booking
    /// cap; repeated dates keep their first position.
    pub fn replace<I>(&mut self, dates: I) -> SelectionChanged
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut seen = HashSet::new();
        self.dates = dates.into_iter().filter(|date| seen.insert(*date)).collect();

        if self.dates.len() > self.capacity {
            tracing::warn!(
                count = self.dates.len(),
                capacity = self.capacity,
                "Picker reported more dates than bookings allowed"
            );
        }

        self.changed()
    }

    /// Drop every date `store` now holds and return what is left, in the
    /// original relative order. Never consults the server.
    pub fn prune_against(&mut self, store: &AvailabilityStore) -> Vec<NaiveDate> {
        self.dates.retain(|date| !store.is_held(*date));
        self.dates.clone()
    }

    pub fn format_for_submission(&self) -> Vec<DateKey> {
        self.dates.iter().copied().map(codec::to_key).collect()
    }

    pub fn changed(&self) -> SelectionChanged {
        SelectionChanged {
            count: self.dates.len(),
            complete: self.is_complete(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.dates.len() == self.capacity
    }

    pub fn summary(&self) -> SelectedDatesSummary {
        SelectedDatesSummary::new(&self.dates, self.capacity)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
