use berth_shared::codec::{self, DateKey};
use berth_shared::AvailabilityEntry;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Dates held on the server as of the last refresh, keyed by date key.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityStore {
    held: HashMap<DateKey, String>,
}

impl AvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything known and rebuild from `entries`.
    /// A date listed twice keeps the later holder.
    pub fn replace_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = AvailabilityEntry>,
    {
        self.held = entries
            .into_iter()
            .map(|entry| (codec::to_key(entry.date), entry.name))
            .collect();
    }

    pub fn is_held(&self, date: NaiveDate) -> bool {
        self.held.contains_key(&codec::to_key(date))
    }

    pub fn holder(&self, date: NaiveDate) -> Option<&str> {
        self.held.get(&codec::to_key(date)).map(String::as_str)
    }

    /// Held date keys in calendar order
    pub fn held_keys(&self) -> Vec<&DateKey> {
        let mut keys: Vec<&DateKey> = self.held.keys().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}
