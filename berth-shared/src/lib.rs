pub mod codec;
pub mod models;

pub use codec::{DateError, DateKey};
pub use models::booking::{AvailabilityEntry, BookingReceipt, BookingRecord, ConflictBody};
