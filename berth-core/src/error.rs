use crate::validity::FieldId;
use crate::workflow::WorkflowState;
use berth_shared::AvailabilityEntry;
use chrono::NaiveDate;

/// Failures reported by a [`crate::BookingApi`] implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The server rejected the booking because some dates were taken first.
    /// Carries the server's full, current list of held dates.
    #[error("Booking conflict: {} dates already booked", .0.len())]
    Conflict(Vec<AvailabilityEntry>),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Booking window is empty: {first} is after {last}")]
    EmptyWindow { first: NaiveDate, last: NaiveDate },

    #[error("number_of_bookings must be at least 1")]
    NoBookings,

    #[error("Booking window holds {available} days but {requested} bookings are required")]
    WindowTooShort { available: i64, requested: usize },

    #[error("No form fields configured")]
    NoFields,

    #[error("Form field {0} is configured more than once")]
    DuplicateField(FieldId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{event} is not accepted while {state:?}")]
    NotAccepting {
        event: &'static str,
        state: WorkflowState,
    },

    #[error("Submit is disabled until the dates and every field are valid")]
    SubmitDisabled,
}
