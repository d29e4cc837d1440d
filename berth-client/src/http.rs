//! JSON-over-HTTP implementation of [`BookingApi`].
//!
//! `ureq` is synchronous, so each request runs on tokio's blocking pool.
//! Non-2xx statuses are read as ordinary responses and classified here.

use crate::app_config::ApiConfig;
use async_trait::async_trait;
use berth_core::{ApiError, BookingApi};
use berth_shared::{AvailabilityEntry, BookingReceipt, BookingRecord, ConflictBody};

const CONFLICT: u16 = 409;

pub struct HttpBookingApi {
    agent: ureq::Agent,
    availability_url: String,
    booking_url: String,
}

impl HttpBookingApi {
    pub fn new(config: &ApiConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            availability_url: config.availability_url(),
            booking_url: config.booking_url(),
        }
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn fetch_availability(&self) -> Result<Vec<AvailabilityEntry>, ApiError> {
        let agent = self.agent.clone();
        let url = self.availability_url.clone();

        tokio::task::spawn_blocking(move || {
            let response = agent
                .get(url.as_str())
                .header("Accept", "application/json")
                .call()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let (status, body) = read_response(response)?;
            classify_availability_response(status, &body)
        })
        .await
        .map_err(|e| ApiError::Transport(format!("task join error: {}", e)))?
    }

    async fn create_booking(&self, record: &BookingRecord) -> Result<BookingReceipt, ApiError> {
        let agent = self.agent.clone();
        let url = self.booking_url.clone();
        let record = record.clone();

        tokio::task::spawn_blocking(move || {
            let response = agent
                .post(url.as_str())
                .header("Accept", "application/json")
                .send_json(&record)
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let (status, body) = read_response(response)?;
            classify_booking_response(status, &body)
        })
        .await
        .map_err(|e| ApiError::Transport(format!("task join error: {}", e)))?
    }
}

fn read_response(
    mut response: ureq::http::Response<ureq::Body>,
) -> Result<(u16, String), ApiError> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(format!("failed to read response body: {}", e)))?;
    Ok((status, body))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

pub fn classify_availability_response(
    status: u16,
    body: &str,
) -> Result<Vec<AvailabilityEntry>, ApiError> {
    if !is_success(status) {
        return Err(ApiError::UnexpectedStatus {
            status,
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// 2xx is a receipt, 409 with an `alreadyBookedDates` body is a conflict,
/// anything else (including a 409 without that body) is a plain failure.
pub fn classify_booking_response(status: u16, body: &str) -> Result<BookingReceipt, ApiError> {
    if is_success(status) {
        if body.trim().is_empty() {
            return Ok(BookingReceipt::default());
        }
        let value = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));
        return Ok(BookingReceipt(value));
    }

    if status == CONFLICT {
        match serde_json::from_str::<ConflictBody>(body) {
            Ok(conflict) => return Err(ApiError::Conflict(conflict.already_booked_dates)),
            Err(e) => {
                tracing::warn!(error = %e, "Conflict response without a booked-dates list");
            }
        }
    }

    Err(ApiError::UnexpectedStatus {
        status,
        body: body.to_string(),
    })
}
