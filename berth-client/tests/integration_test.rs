use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use berth_client::{ApiConfig, HttpBookingApi};
use berth_core::view::{Confirmation, ConflictNotice, ErrorBanner, SelectedDatesSummary};
use berth_core::{
    ApiError, BookingApi, BookingConfig, BookingView, BookingWorkflow, DatePicker, FieldId,
    Messages, PickerConfig, SubmitOutcome, WorkflowState,
};
use berth_shared::BookingRecord;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// In-process stand-in for the booking server.
#[derive(Clone, Default)]
struct Harbour {
    held: Arc<Mutex<Vec<(String, String)>>>,
    /// Response for the next POST, overriding the normal conflict check.
    forced: Arc<Mutex<Option<(StatusCode, String)>>>,
    received: Arc<Mutex<Vec<Value>>>,
}

impl Harbour {
    fn hold(&self, date: &str, name: &str) {
        self.held.lock().unwrap().push((date.to_string(), name.to_string()));
    }

    fn force_next(&self, status: StatusCode, body: &str) {
        *self.forced.lock().unwrap() = Some((status, body.to_string()));
    }

    fn listing(&self) -> Value {
        let held = self.held.lock().unwrap();
        Value::Array(
            held.iter()
                .map(|(date, name)| json!({"date": date, "name": name}))
                .collect(),
        )
    }
}

async fn list_bookings(State(harbour): State<Harbour>) -> impl IntoResponse {
    Json(harbour.listing())
}

async fn create_booking(
    State(harbour): State<Harbour>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    harbour.received.lock().unwrap().push(body.clone());

    if let Some((status, raw)) = harbour.forced.lock().unwrap().take() {
        return (status, raw).into_response();
    }

    let record: BookingRecord = match serde_json::from_value(body.clone()) {
        Ok(record) => record,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    let taken = {
        let held = harbour.held.lock().unwrap();
        record
            .dates
            .iter()
            .any(|key| held.iter().any(|(date, _)| date == key.as_str()))
    };
    if taken {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "alreadyBookedDates": harbour.listing() })),
        )
            .into_response();
    }

    for key in &record.dates {
        harbour.hold(key.as_str(), &record.name);
    }
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn serve(harbour: Harbour) -> ApiConfig {
    let app = Router::new()
        .route("/api/1/bookings", get(list_bookings))
        .route("/api/1/booking", post(create_booking))
        .with_state(harbour);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiConfig::new(format!("http://{}", addr))
}

#[derive(Default)]
struct NullView {
    errors: Vec<String>,
    conflicts: Vec<ConflictNotice>,
    confirmed: Option<Confirmation>,
}

impl BookingView for NullView {
    fn show_selected_dates(&mut self, _summary: &SelectedDatesSummary) {}
    fn show_confirmation(&mut self, confirmation: &Confirmation) {
        self.confirmed = Some(confirmation.clone());
    }
    fn show_error(&mut self, banner: &ErrorBanner) {
        self.errors.push(banner.message.clone());
    }
    fn show_conflict(&mut self, notice: &ConflictNotice) {
        self.conflicts.push(notice.clone());
    }
    fn set_content_visible(&mut self, _visible: bool) {}
    fn set_submit_enabled(&mut self, _enabled: bool) {}
}

#[derive(Default)]
struct NullPicker {
    selection: Vec<NaiveDate>,
}

impl DatePicker for NullPicker {
    fn init(&mut self, _config: &PickerConfig) {}
    fn set_selection(&mut self, dates: &[NaiveDate]) {
        self.selection = dates.to_vec();
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn ready_workflow(api: ApiConfig) -> BookingWorkflow<NullView, NullPicker> {
    let mut workflow = BookingWorkflow::new(
        BookingConfig::default(),
        Messages::default(),
        Arc::new(HttpBookingApi::new(&api)),
        NullView::default(),
        NullPicker::default(),
    )
    .unwrap();
    workflow.load().await.unwrap();
    workflow.field_changed(FieldId::Name, "Maija").unwrap();
    workflow.field_changed(FieldId::Boat, "Ulla").unwrap();
    workflow.field_changed(FieldId::Email, "maija@example.fi").unwrap();
    workflow
}

#[tokio::test]
async fn test_fetch_availability() {
    let harbour = Harbour::default();
    harbour.hold("2016-06-10", "Berg");
    let api = HttpBookingApi::new(&serve(harbour).await);

    let entries = api.fetch_availability().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, ymd(2016, 6, 10));
    assert_eq!(entries[0].name, "Berg");
}

#[tokio::test]
async fn test_booking_happy_path_over_http() {
    let harbour = Harbour::default();
    harbour.hold("2016-05-20", "Berg");
    let mut workflow = ready_workflow(serve(harbour.clone()).await).await;
    assert!(workflow.availability().is_held(ymd(2016, 5, 20)));

    workflow.select_dates(vec![ymd(2016, 6, 1), ymd(2016, 6, 2)]).unwrap();
    assert_eq!(workflow.submit().await.unwrap(), SubmitOutcome::Confirmed);
    assert_eq!(workflow.state(), WorkflowState::Confirmed);

    let received = harbour.received.lock().unwrap();
    assert_eq!(received[0]["dates"], json!(["2016-06-01", "2016-06-02"]));
    assert_eq!(received[0]["boat"], "Ulla");
    let confirmation = workflow.view().confirmed.as_ref().unwrap();
    assert_eq!(confirmation.receipt.0["name"], "Maija");
}

#[tokio::test]
async fn test_conflict_recovery_over_http() {
    let harbour = Harbour::default();
    let mut workflow = ready_workflow(serve(harbour.clone()).await).await;
    workflow.select_dates(vec![ymd(2016, 6, 1), ymd(2016, 6, 2)]).unwrap();

    // someone else books the first date after our availability fetch
    harbour.hold("2016-06-01", "X");

    let outcome = workflow.submit().await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Conflict { taken: vec![ymd(2016, 6, 1)] });
    assert_eq!(workflow.state(), WorkflowState::Ready);
    assert_eq!(workflow.selection().dates(), &[ymd(2016, 6, 2)]);
    assert_eq!(workflow.picker().selection, vec![ymd(2016, 6, 2)]);
    assert!(!workflow.is_submit_enabled());
    assert_eq!(workflow.view().conflicts.len(), 1);

    workflow.select_dates(vec![ymd(2016, 6, 2), ymd(2016, 6, 3)]).unwrap();
    assert_eq!(workflow.submit().await.unwrap(), SubmitOutcome::Confirmed);
}

#[tokio::test]
async fn test_malformed_conflict_is_generic_failure() {
    let harbour = Harbour::default();
    let mut workflow = ready_workflow(serve(harbour.clone()).await).await;
    workflow.select_dates(vec![ymd(2016, 6, 1), ymd(2016, 6, 2)]).unwrap();

    harbour.force_next(StatusCode::CONFLICT, r#"{"error": "taken"}"#);
    assert_eq!(workflow.submit().await.unwrap(), SubmitOutcome::Failed);
    assert!(workflow.view().conflicts.is_empty());
    assert_eq!(workflow.view().errors, vec![Messages::default().submit_failed]);
    assert!(workflow.is_submit_enabled());
}

#[tokio::test]
async fn test_server_error_maps_to_unexpected_status() {
    let harbour = Harbour::default();
    harbour.force_next(StatusCode::INTERNAL_SERVER_ERROR, "database down");
    let api = HttpBookingApi::new(&serve(harbour).await);

    let record = BookingRecord {
        name: "Maija".to_string(),
        boat: "Ulla".to_string(),
        email: "maija@example.fi".to_string(),
        dates: Vec::new(),
    };
    let err = api.create_booking(&record).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::UnexpectedStatus {
            status: 500,
            body: "database down".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpBookingApi::new(&ApiConfig::new(format!("http://{}", addr)));
    assert!(matches!(api.fetch_availability().await, Err(ApiError::Transport(_))));
}
