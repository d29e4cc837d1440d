pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod gate;
pub mod selection;
pub mod validity;
pub mod view;
pub mod workflow;

pub use berth_shared::codec as date;

pub use api::BookingApi;
pub use availability::AvailabilityStore;
pub use config::{BookingConfig, Messages};
pub use error::{ApiError, ConfigError, WorkflowError};
pub use gate::{GateInput, SubmitGate};
pub use selection::{SelectionChanged, SelectionState};
pub use validity::{FieldFormat, FieldId, FieldSpec, FieldValidityStream};
pub use view::{BookingView, DatePicker, DateStyle, PickerConfig};
pub use workflow::{BookingWorkflow, SubmitOutcome, WorkflowState};
