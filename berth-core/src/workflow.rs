//! The booking session state machine.
//!
//! ```text
//! Loading ──ok──▶ Ready ──submit──▶ Submitting ──ok──────▶ Confirmed
//!    │              ▲                   │
//!    └─err─▶ LoadFailed                 ├─conflict─▶ prune selection ─▶ Ready
//!            (reload ▶ Loading)         └─failure──▶ error banner ────▶ Ready
//! ```
//!
//! Each network round trip is split into a `begin_*` and a `complete_*` half
//! so a host event loop can deliver responses itself; [`BookingWorkflow::load`]
//! and [`BookingWorkflow::submit`] drive both halves through [`BookingApi`].

use crate::api::BookingApi;
use crate::availability::AvailabilityStore;
use crate::config::{BookingConfig, Messages};
use crate::error::{ApiError, ConfigError, WorkflowError};
use crate::gate::{GateInput, SubmitGate};
use crate::selection::{SelectionChanged, SelectionState};
use crate::validity::{FieldId, FieldValidityStream};
use crate::view::{
    BookingView, Confirmation, ConflictNotice, DatePicker, DateStyle, ErrorBanner, PickerConfig,
    SelectedDatesSummary,
};
use berth_shared::codec;
use berth_shared::{AvailabilityEntry, BookingReceipt, BookingRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    /// Availability fetch in flight; the picker is not initialised yet.
    Loading,
    /// Availability fetch failed. Non-interactive until reloaded.
    LoadFailed,
    Ready,
    /// A create-booking request is in flight.
    Submitting,
    Confirmed,
}

/// How the last submission attempt resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Confirmed,
    /// Dates removed from the selection because someone else holds them now.
    Conflict { taken: Vec<NaiveDate> },
    Failed,
}

struct Submission {
    record: BookingRecord,
    dates: Vec<NaiveDate>,
}

pub struct BookingWorkflow<V, P> {
    session_id: Uuid,
    config: BookingConfig,
    messages: Messages,
    api: Arc<dyn BookingApi>,
    view: V,
    picker: P,
    state: WorkflowState,
    availability: AvailabilityStore,
    selection: SelectionState,
    fields: Vec<FieldValidityStream>,
    contents: HashMap<FieldId, String>,
    gate: SubmitGate,
    in_flight: Option<Submission>,
    last_outcome: Option<SubmitOutcome>,
}

impl<V: BookingView, P: DatePicker> BookingWorkflow<V, P> {
    pub fn new(
        config: BookingConfig,
        messages: Messages,
        api: Arc<dyn BookingApi>,
        mut view: V,
        picker: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let fields = config
            .form_fields
            .iter()
            .cloned()
            .map(FieldValidityStream::new)
            .collect();
        let gate = SubmitGate::for_fields(config.field_ids());
        let selection = SelectionState::new(config.number_of_bookings);

        view.set_submit_enabled(gate.is_open());

        let session_id = Uuid::new_v4();
        tracing::debug!(
            %session_id,
            bookings = config.number_of_bookings,
            "Booking session created"
        );

        Ok(Self {
            session_id,
            config,
            messages,
            api,
            view,
            picker,
            state: WorkflowState::Loading,
            availability: AvailabilityStore::new(),
            selection,
            fields,
            contents: HashMap::new(),
            gate,
            in_flight: None,
            last_outcome: None,
        })
    }

    /// Fetch availability and enter `Ready` (or `LoadFailed`).
    pub async fn load(&mut self) -> Result<(), WorkflowError> {
        self.begin_load()?;
        let result = self.api.fetch_availability().await;
        self.complete_load(result)
    }

    /// Start (or, after a failure, restart) the availability fetch.
    pub fn begin_load(&mut self) -> Result<(), WorkflowError> {
        self.expect_state("load", &[WorkflowState::Loading, WorkflowState::LoadFailed])?;
        self.transition(WorkflowState::Loading);
        Ok(())
    }

    pub fn complete_load(
        &mut self,
        result: Result<Vec<AvailabilityEntry>, ApiError>,
    ) -> Result<(), WorkflowError> {
        self.expect_state("availability response", &[WorkflowState::Loading])?;

        match result {
            Ok(entries) => {
                self.availability.replace_all(entries);
                tracing::info!(
                    session_id = %self.session_id,
                    held = self.availability.len(),
                    "Availability loaded"
                );
                self.transition(WorkflowState::Ready);
                // the picker styles held dates, so it waits for availability
                let picker_config = self.picker_config();
                self.picker.init(&picker_config);
                self.view.show_selected_dates(&self.selection.summary());
            }
            Err(err) => {
                tracing::error!(
                    session_id = %self.session_id,
                    error = %err,
                    "Fetching availability failed"
                );
                self.view.show_error(&ErrorBanner {
                    message: self.messages.load_failed.clone(),
                });
                self.transition(WorkflowState::LoadFailed);
            }
        }
        Ok(())
    }

    /// The picker reported a new selection.
    pub fn select_dates<I>(&mut self, dates: I) -> Result<SelectionChanged, WorkflowError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.expect_state("selection change", &[WorkflowState::Ready])?;

        let changed = self.selection.replace(dates);
        self.view.show_selected_dates(&self.selection.summary());
        self.feed_gate(GateInput::DateCount, changed.complete);
        Ok(changed)
    }

    /// A form field's content changed. Accepted while loading too, since the
    /// form is editable before availability arrives.
    pub fn field_changed(&mut self, field: FieldId, content: &str) -> Result<(), WorkflowError> {
        self.expect_state(
            "field change",
            &[WorkflowState::Loading, WorkflowState::LoadFailed, WorkflowState::Ready],
        )?;

        self.contents.insert(field, content.to_string());

        let emitted = self
            .fields
            .iter_mut()
            .find(|stream| stream.field() == field)
            .and_then(|stream| stream.on_content(content));
        if let Some(valid) = emitted {
            tracing::debug!(session_id = %self.session_id, %field, valid, "Field validity changed");
            self.feed_gate(GateInput::Field(field), valid);
        }
        Ok(())
    }

    /// Submit, wait for the server, and resolve the attempt.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        let record = self.begin_submit()?;
        let result = self.api.create_booking(&record).await;
        self.complete_submit(result)
    }

    /// Assemble the booking record, hide the form and enter `Submitting`.
    /// Only the gate decides whether submitting is allowed.
    pub fn begin_submit(&mut self) -> Result<BookingRecord, WorkflowError> {
        self.expect_state("submit", &[WorkflowState::Ready])?;
        if !self.gate.is_open() {
            return Err(WorkflowError::SubmitDisabled);
        }

        let record = BookingRecord {
            name: self.content(FieldId::Name),
            boat: self.content(FieldId::Boat),
            email: self.content(FieldId::Email),
            dates: self.selection.format_for_submission(),
        };
        self.in_flight = Some(Submission {
            record: record.clone(),
            dates: self.selection.dates().to_vec(),
        });

        self.view.set_content_visible(false);
        self.transition(WorkflowState::Submitting);
        tracing::info!(session_id = %self.session_id, dates = ?record.dates, "Submitting booking");
        Ok(record)
    }

    pub fn complete_submit(
        &mut self,
        result: Result<BookingReceipt, ApiError>,
    ) -> Result<SubmitOutcome, WorkflowError> {
        self.expect_state("booking response", &[WorkflowState::Submitting])?;
        let Some(submission) = self.in_flight.take() else {
            return Err(WorkflowError::NotAccepting {
                event: "booking response",
                state: self.state,
            });
        };

        let outcome = match result {
            Ok(receipt) => self.confirm(submission, receipt),
            Err(ApiError::Conflict(already_booked)) => self.recover_from_conflict(already_booked),
            Err(err) => self.fail_submission(err),
        };

        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    fn confirm(&mut self, submission: Submission, receipt: BookingReceipt) -> SubmitOutcome {
        let confirmation = Confirmation {
            dates: SelectedDatesSummary::new(&submission.dates, self.config.number_of_bookings),
            record: submission.record,
            receipt,
        };
        self.view.show_confirmation(&confirmation);
        self.transition(WorkflowState::Confirmed);
        SubmitOutcome::Confirmed
    }

    /// The server's list replaces what we knew; the selection is filtered
    /// against it so the visitor only has to re-pick the taken dates.
    fn recover_from_conflict(&mut self, already_booked: Vec<AvailabilityEntry>) -> SubmitOutcome {
        self.availability.replace_all(already_booked);

        let before = self.selection.dates().to_vec();
        let retained = self.selection.prune_against(&self.availability);
        let taken: Vec<NaiveDate> = before
            .into_iter()
            .filter(|date| !retained.contains(date))
            .collect();

        tracing::warn!(
            session_id = %self.session_id,
            taken = ?taken.iter().map(|d| codec::to_key(*d)).collect::<Vec<_>>(),
            held = self.availability.len(),
            "Booking conflict, selection pruned"
        );

        self.feed_gate(GateInput::DateCount, self.selection.is_complete());
        self.picker.set_selection(&retained);
        self.view.show_selected_dates(&self.selection.summary());
        self.view.show_conflict(&ConflictNotice {
            message: self.messages.date_conflict.clone(),
            taken: taken.iter().map(|d| codec::to_display(*d)).collect(),
        });
        self.view.set_content_visible(true);
        self.transition(WorkflowState::Ready);

        SubmitOutcome::Conflict { taken }
    }

    fn fail_submission(&mut self, err: ApiError) -> SubmitOutcome {
        tracing::error!(session_id = %self.session_id, error = %err, "Saving booking failed");
        self.view.show_error(&ErrorBanner {
            message: self.messages.submit_failed.clone(),
        });
        self.view.set_content_visible(true);
        self.transition(WorkflowState::Ready);
        SubmitOutcome::Failed
    }

    /// Styling hint for one calendar day.
    pub fn date_style(&self, date: NaiveDate) -> DateStyle {
        match self.availability.holder(date) {
            Some(holder) => DateStyle::Unavailable {
                holder: holder.to_string(),
            },
            None => DateStyle::Available,
        }
    }

    pub fn picker_config(&self) -> PickerConfig {
        PickerConfig {
            min_date: self.config.first_date,
            max_date: self.config.last_date,
            max_selection: self.config.number_of_bookings,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.state == WorkflowState::Ready && self.gate.is_open()
    }

    pub fn gate(&self) -> &SubmitGate {
        &self.gate
    }

    pub fn availability(&self) -> &AvailabilityStore {
        &self.availability
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn last_outcome(&self) -> Option<&SubmitOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn picker(&self) -> &P {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut P {
        &mut self.picker
    }

    fn content(&self, field: FieldId) -> String {
        self.contents.get(&field).cloned().unwrap_or_default()
    }

    fn feed_gate(&mut self, input: GateInput, value: bool) {
        if let Some(open) = self.gate.update(input, value) {
            tracing::debug!(session_id = %self.session_id, open, "Submit gate changed");
            self.view.set_submit_enabled(open);
        }
    }

    fn expect_state(
        &self,
        event: &'static str,
        allowed: &[WorkflowState],
    ) -> Result<(), WorkflowError> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        tracing::warn!(session_id = %self.session_id, event, state = ?self.state, "Event rejected");
        Err(WorkflowError::NotAccepting {
            event,
            state: self.state,
        })
    }

    fn transition(&mut self, to: WorkflowState) {
        if self.state != to {
            tracing::info!(
                session_id = %self.session_id,
                from = ?self.state,
                ?to,
                "Workflow transition"
            );
        }
        self.state = to;
    }
}
