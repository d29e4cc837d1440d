use crate::codec::{serde_date, DateKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A date already held on the server and the party holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    #[serde(with = "serde_date")]
    pub date: NaiveDate,
    pub name: String,
}

impl AvailabilityEntry {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// Payload of the create-booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub name: String,
    pub boat: String,
    pub email: String,
    pub dates: Vec<DateKey>,
}

/// Body of a 409 response. Reuses the availability-list entry shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictBody {
    pub already_booked_dates: Vec<AvailabilityEntry>,
}

/// Opaque success body echoed back by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingReceipt(pub serde_json::Value);
