use berth_core::{BookingConfig, Messages};
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub messages: Messages,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_availability_path")]
    pub availability_path: String,
    #[serde(default = "default_booking_path")]
    pub booking_path: String,
}

fn default_availability_path() -> String { "/api/1/bookings".to_string() }

fn default_booking_path() -> String { "/api/1/booking".to_string() }

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            availability_path: default_availability_path(),
            booking_path: default_booking_path(),
        }
    }

    pub fn availability_url(&self) -> String {
        join_url(&self.base_url, &self.availability_path)
    }

    pub fn booking_url(&self) -> String {
        join_url(&self.base_url, &self.booking_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Layered load: `{dir}/default`, optional `{dir}/{RUN_MODE}` and
    /// `{dir}/local`, then `BERTH__SECTION__KEY` environment overrides.
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&source(dir, "default")))
            .add_source(config::File::with_name(&source(dir, &run_mode)).required(false))
            // not checked in
            .add_source(config::File::with_name(&source(dir, "local")).required(false))
            .add_source(config::Environment::with_prefix("BERTH").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config
            .booking
            .validate()
            .map_err(|err| config::ConfigError::Message(err.to_string()))?;
        Ok(config)
    }
}

fn source(dir: &Path, name: &str) -> String {
    dir.join(name).to_string_lossy().into_owned()
}
