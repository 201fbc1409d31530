use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_STORAGE_KEY: &str = "pg_overview_schedule_v1";
const DEFAULT_SCHEDULE_YEARS: usize = 5;
const DEFAULT_EVENTS_PER_YEAR: usize = 12;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppProfile {
    Dev,
    Prod,
}

impl AppProfile {
    pub fn from_env(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("prod") | Some("production") => Self::Prod,
            _ => Self::Dev,
        }
    }

    pub fn log_level(self) -> tracing::Level {
        match self {
            Self::Dev => tracing::Level::INFO,
            Self::Prod => tracing::Level::WARN,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub profile: AppProfile,
    /// Only honoured on native targets; the browser transport has its own.
    pub request_timeout: Option<Duration>,
    pub schedule_years: usize,
    pub events_per_year: usize,
    pub storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            profile: AppProfile::Dev,
            request_timeout: None,
            schedule_years: DEFAULT_SCHEDULE_YEARS,
            events_per_year: DEFAULT_EVENTS_PER_YEAR,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        crate::config::load_dotenv();

        Self::from_lookup(read_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("POLICY_GAME_API_BASE") {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                config.api_base_url = trimmed.to_string();
            }
        }

        config.profile = AppProfile::from_env(lookup("POLICY_GAME_PROFILE"));

        if let Some(secs) =
            lookup("POLICY_GAME_REQUEST_TIMEOUT_SECS").and_then(|value| value.parse::<u64>().ok())
        {
            config.request_timeout = Some(Duration::from_secs(secs.max(1)));
        }

        if let Some(years) =
            lookup("POLICY_GAME_SCHEDULE_YEARS").and_then(|value| value.parse::<usize>().ok())
        {
            config.schedule_years = years.max(1);
        }

        if let Some(events) =
            lookup("POLICY_GAME_EVENTS_PER_YEAR").and_then(|value| value.parse::<usize>().ok())
        {
            config.events_per_year = events.max(1);
        }

        if let Some(key) = lookup("POLICY_GAME_STORAGE_KEY") {
            if !key.trim().is_empty() {
                config.storage_key = key.trim().to_string();
            }
        }

        config
    }

    /// Upper bound on how many ids a fresh schedule keeps.
    pub fn schedule_capacity(&self) -> usize {
        self.schedule_years.saturating_mul(self.events_per_year)
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| option_env_from_build(key).map(|s| s.to_string()))
}

fn option_env_from_build(key: &str) -> Option<&'static str> {
    match key {
        "POLICY_GAME_API_BASE" => option_env!("POLICY_GAME_API_BASE"),
        "POLICY_GAME_PROFILE" => option_env!("POLICY_GAME_PROFILE"),
        "POLICY_GAME_REQUEST_TIMEOUT_SECS" => option_env!("POLICY_GAME_REQUEST_TIMEOUT_SECS"),
        "POLICY_GAME_SCHEDULE_YEARS" => option_env!("POLICY_GAME_SCHEDULE_YEARS"),
        "POLICY_GAME_EVENTS_PER_YEAR" => option_env!("POLICY_GAME_EVENTS_PER_YEAR"),
        "POLICY_GAME_STORAGE_KEY" => option_env!("POLICY_GAME_STORAGE_KEY"),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("failed to load .env: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn load_dotenv() {}
