use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Radius escalation bounds for POI searches, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusSettings {
    pub initial_m: u32,
    pub step_m: u32,
    pub max_m: u32,
}

impl Default for RadiusSettings {
    fn default() -> Self {
        Self {
            initial_m: 8_000,
            step_m: 2_000,
            max_m: 20_000,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub mapbox_access_token: String,
    pub overpass_url: String,
    pub mapbox_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub radius: RadiusSettings,
    pub geocoder_limit: u32,
    pub debounce_ms: u64,
    pub history_path: PathBuf,
    pub history_capacity: usize,
    pub taxonomy_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("mapbox_access_token", &"[redacted]")
            .field("overpass_url", &self.overpass_url)
            .field("mapbox_url", &self.mapbox_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("radius", &self.radius)
            .field("geocoder_limit", &self.geocoder_limit)
            .field("debounce_ms", &self.debounce_ms)
            .field("history_path", &self.history_path)
            .field("history_capacity", &self.history_capacity)
            .field("taxonomy_path", &self.taxonomy_path)
            .finish()
    }
}
