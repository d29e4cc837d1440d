//! Contracts of the external collaborators the workflow renders into: the
//! calendar picker and the page's render targets. The workflow hands them
//! plain data; markup is their concern.

use berth_shared::codec;
use berth_shared::{BookingReceipt, BookingRecord};
use chrono::NaiveDate;
use serde::Serialize;

/// Render targets on the booking page.
pub trait BookingView {
    fn show_selected_dates(&mut self, summary: &SelectedDatesSummary);
    fn show_confirmation(&mut self, confirmation: &Confirmation);
    fn show_error(&mut self, banner: &ErrorBanner);
    fn show_conflict(&mut self, notice: &ConflictNotice);
    /// Hide or restore the form content area.
    fn set_content_visible(&mut self, visible: bool);
    fn set_submit_enabled(&mut self, enabled: bool);
}

/// Calendar widget. It reports selections back through
/// [`crate::BookingWorkflow::select_dates`] and styles days with
/// [`crate::BookingWorkflow::date_style`].
pub trait DatePicker {
    fn init(&mut self, config: &PickerConfig);
    /// Overwrite the visual selection. Only used after a conflict.
    fn set_selection(&mut self, dates: &[NaiveDate]);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerConfig {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub max_selection: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DateStyle {
    Available,
    /// Held by someone else; rendered distinctly and not selectable.
    Unavailable { holder: String },
}

impl DateStyle {
    pub fn is_selectable(&self) -> bool {
        matches!(self, DateStyle::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateSlot {
    pub index: usize,
    /// Display date, `None` while the slot is still unfilled.
    pub date: Option<String>,
}

/// Numbered slots 1..N for the selected dates. Unfilled slots are padded up
/// to the booking count, an empty selection has no slots at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedDatesSummary {
    pub count: usize,
    pub slots: Vec<DateSlot>,
}

impl SelectedDatesSummary {
    pub fn new(dates: &[NaiveDate], capacity: usize) -> Self {
        if dates.is_empty() {
            return Self {
                count: 0,
                slots: Vec::new(),
            };
        }

        let filled = dates.iter().map(|date| Some(codec::to_display(*date)));
        let unfilled = std::iter::repeat(None).take(capacity.saturating_sub(dates.len()));
        let slots = filled
            .chain(unfilled)
            .enumerate()
            .map(|(i, date)| DateSlot { index: i + 1, date })
            .collect();

        Self {
            count: dates.len(),
            slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub record: BookingRecord,
    pub receipt: BookingReceipt,
    pub dates: SelectedDatesSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBanner {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictNotice {
    pub message: String,
    /// Display dates dropped from the selection because they were taken.
    pub taken: Vec<String>,
}
