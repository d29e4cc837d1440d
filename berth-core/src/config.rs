use crate::error::ConfigError;
use crate::validity::{FieldFormat, FieldId, FieldSpec};
use berth_shared::codec::serde_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Booking session parameters: the bookable window, how many dates one
/// booking takes, and which form fields must be valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(with = "serde_date", default = "default_first_date")]
    pub first_date: NaiveDate,
    #[serde(with = "serde_date", default = "default_last_date")]
    pub last_date: NaiveDate,
    #[serde(default = "default_number_of_bookings")]
    pub number_of_bookings: usize,
    #[serde(default = "default_form_fields")]
    pub form_fields: Vec<FieldSpec>,
}

fn default_first_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 5, 1).unwrap_or_default()
}

fn default_last_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 10, 2).unwrap_or_default()
}

fn default_number_of_bookings() -> usize { 2 }

fn default_form_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(FieldId::Name, 3),
        FieldSpec::new(FieldId::Boat, 2),
        FieldSpec::new(FieldId::Email, 7).with_format(FieldFormat::Email),
    ]
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            first_date: default_first_date(),
            last_date: default_last_date(),
            number_of_bookings: default_number_of_bookings(),
            form_fields: default_form_fields(),
        }
    }
}

impl BookingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_date > self.last_date {
            return Err(ConfigError::EmptyWindow {
                first: self.first_date,
                last: self.last_date,
            });
        }
        if self.number_of_bookings == 0 {
            return Err(ConfigError::NoBookings);
        }

        let available = (self.last_date - self.first_date).num_days() + 1;
        let fits = usize::try_from(available).is_ok_and(|days| days >= self.number_of_bookings);
        if !fits {
            return Err(ConfigError::WindowTooShort {
                available,
                requested: self.number_of_bookings,
            });
        }

        if self.form_fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        let mut seen = HashSet::new();
        for spec in &self.form_fields {
            if !seen.insert(spec.field) {
                return Err(ConfigError::DuplicateField(spec.field));
            }
        }

        Ok(())
    }

    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.form_fields.iter().map(|spec| spec.field)
    }
}

/// Fixed user-facing strings, one per failure category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "default_load_failed")]
    pub load_failed: String,
    #[serde(default = "default_submit_failed")]
    pub submit_failed: String,
    #[serde(default = "default_date_conflict")]
    pub date_conflict: String,
}

fn default_load_failed() -> String {
    "Fetching booking information failed. Please try again later.".to_string()
}

fn default_submit_failed() -> String {
    "Saving the booking failed. Please try again later or contact the harbour office.".to_string()
}

fn default_date_conflict() -> String {
    "A date you selected had already been booked. Please check your selection.".to_string()
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            load_failed: default_load_failed(),
            submit_failed: default_submit_failed(),
            date_conflict: default_date_conflict(),
        }
    }
}
