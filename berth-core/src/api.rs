use crate::error::ApiError;
use async_trait::async_trait;
use berth_shared::{AvailabilityEntry, BookingReceipt, BookingRecord};

/// Server endpoints the booking workflow talks to.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Every date currently held, with its holder.
    async fn fetch_availability(&self) -> Result<Vec<AvailabilityEntry>, ApiError>;

    /// Create a booking. A date race must surface as [`ApiError::Conflict`].
    async fn create_booking(&self, record: &BookingRecord) -> Result<BookingReceipt, ApiError>;
}
