pub mod app_config;
pub mod http;

pub use app_config::{ApiConfig, AppConfig};
pub use http::HttpBookingApi;
