//! Plain-text render targets and a line-driven calendar picker.

use berth_core::date;
use berth_core::view::{Confirmation, ConflictNotice, ErrorBanner, SelectedDatesSummary};
use berth_core::{BookingView, DatePicker, DateStyle, PickerConfig};
use chrono::NaiveDate;

const NOT_SELECTED: &str = "not selected";

pub fn render_summary(summary: &SelectedDatesSummary) -> String {
    let mut out = format!("selected dates: {}", summary.count);
    for slot in &summary.slots {
        let date = slot.date.as_deref().unwrap_or(NOT_SELECTED);
        out.push_str(&format!("\n  {}. {}", slot.index, date));
    }
    out
}

pub fn render_confirmation(confirmation: &Confirmation) -> String {
    let record = &confirmation.record;
    format!(
        "booking confirmed for {} ({}), boat {}\n{}",
        record.name,
        record.email,
        record.boat,
        render_summary(&confirmation.dates)
    )
}

/// Writes every render target to stdout.
#[derive(Debug)]
pub struct TerminalView {
    content_visible: bool,
    submit_enabled: bool,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self {
            content_visible: true,
            submit_enabled: false,
        }
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &'static str {
        match (self.content_visible, self.submit_enabled) {
            (false, _) => "(waiting) ",
            (true, true) => "[submit ready]> ",
            (true, false) => "> ",
        }
    }
}

impl BookingView for TerminalView {
    fn show_selected_dates(&mut self, summary: &SelectedDatesSummary) {
        println!("{}", render_summary(summary));
    }

    fn show_confirmation(&mut self, confirmation: &Confirmation) {
        println!("{}", render_confirmation(confirmation));
    }

    fn show_error(&mut self, banner: &ErrorBanner) {
        println!("!! {}", banner.message);
    }

    fn show_conflict(&mut self, notice: &ConflictNotice) {
        println!("!! {}", notice.message);
        if !notice.taken.is_empty() {
            println!("   no longer available: {}", notice.taken.join(", "));
        }
    }

    fn set_content_visible(&mut self, visible: bool) {
        self.content_visible = visible;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    OutsideWindow,
    Held { holder: String },
    OverLimit,
}

/// Calendar stand-in. Like a multi-select widget it keeps its own
/// selection: picking a selected day clears it, picking a free day adds it
/// while there is room. Days outside the window and held days are refused.
#[derive(Debug, Default)]
pub struct TerminalPicker {
    config: Option<PickerConfig>,
    selection: Vec<NaiveDate>,
}

impl TerminalPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&PickerConfig> {
        self.config.as_ref()
    }

    pub fn selection(&self) -> &[NaiveDate] {
        &self.selection
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Apply clicked days, each paired with its calendar styling, to the
    /// current selection. Returns the full selection afterwards together
    /// with the refused days.
    pub fn pick<I>(&mut self, clicked: I) -> (Vec<NaiveDate>, Vec<(NaiveDate, Rejection)>)
    where
        I: IntoIterator<Item = (NaiveDate, DateStyle)>,
    {
        let mut rejected = Vec::new();

        for (date, style) in clicked {
            let in_window = self
                .config
                .as_ref()
                .is_some_and(|config| config.min_date <= date && date <= config.max_date);
            if !in_window {
                rejected.push((date, Rejection::OutsideWindow));
                continue;
            }

            if let Some(position) = self.selection.iter().position(|picked| *picked == date) {
                self.selection.remove(position);
                continue;
            }

            let max_selection = self.config.as_ref().map_or(0, |config| config.max_selection);
            match style {
                DateStyle::Unavailable { holder } => {
                    rejected.push((date, Rejection::Held { holder }))
                }
                DateStyle::Available if self.selection.len() >= max_selection => {
                    rejected.push((date, Rejection::OverLimit))
                }
                DateStyle::Available => self.selection.push(date),
            }
        }

        (self.selection.clone(), rejected)
    }
}

impl DatePicker for TerminalPicker {
    fn init(&mut self, config: &PickerConfig) {
        println!(
            "calendar open {} to {}, pick {} dates",
            date::to_display(config.min_date),
            date::to_display(config.max_date),
            config.max_selection
        );
        self.config = Some(config.clone());
    }

    fn set_selection(&mut self, dates: &[NaiveDate]) {
        self.selection = dates.to_vec();
    }
}
