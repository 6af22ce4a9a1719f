use crate::app_config::{AppConfig, Environment, RadiusSettings};
use crate::taxonomy::{load_taxonomy, Taxonomy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// The category table to use: the YAML override when configured, else the
/// built-in table.
///
/// # Errors
///
/// Returns `ConfigError` if the configured file cannot be loaded or is invalid.
pub fn resolve_taxonomy(config: &AppConfig) -> Result<Taxonomy, ConfigError> {
    match &config.taxonomy_path {
        Some(path) => load_taxonomy(path),
        None => Ok(Taxonomy::builtin()),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let mapbox_access_token = require("MAPBOX_ACCESS_TOKEN")?;
    let env = parse_environment(&or_default("PLACEFIND_ENV", "development"))?;
    let log_level = or_default("PLACEFIND_LOG_LEVEL", "info");

    let overpass_url = or_default(
        "PLACEFIND_OVERPASS_URL",
        "https://overpass-api.de/api/interpreter",
    );
    let mapbox_url = or_default("PLACEFIND_MAPBOX_URL", "https://api.mapbox.com");
    let request_timeout_secs = parse_u64("PLACEFIND_REQUEST_TIMEOUT_SECS", "25")?;
    let user_agent = or_default("PLACEFIND_USER_AGENT", "placefind/0.1 (poi-search)");

    let radius = RadiusSettings {
        initial_m: parse_u32("PLACEFIND_RADIUS_INITIAL_M", "8000")?,
        step_m: parse_u32("PLACEFIND_RADIUS_STEP_M", "2000")?,
        max_m: parse_u32("PLACEFIND_RADIUS_MAX_M", "20000")?,
    };
    if radius.step_m == 0 {
        return Err(invalid(
            "PLACEFIND_RADIUS_STEP_M",
            "step must be greater than zero".to_string(),
        ));
    }
    if radius.initial_m > radius.max_m {
        return Err(invalid(
            "PLACEFIND_RADIUS_INITIAL_M",
            format!(
                "initial radius {} exceeds maximum radius {}",
                radius.initial_m, radius.max_m
            ),
        ));
    }

    let geocoder_limit = parse_u32("PLACEFIND_GEOCODER_LIMIT", "5")?;
    let debounce_ms = parse_u64("PLACEFIND_DEBOUNCE_MS", "300")?;
    let history_path = PathBuf::from(or_default(
        "PLACEFIND_HISTORY_PATH",
        "./placefind-history.json",
    ));
    let history_capacity = parse_usize("PLACEFIND_HISTORY_CAPACITY", "10")?;
    if history_capacity == 0 {
        return Err(invalid(
            "PLACEFIND_HISTORY_CAPACITY",
            "capacity must be greater than zero".to_string(),
        ));
    }
    let taxonomy_path = lookup("PLACEFIND_TAXONOMY_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        mapbox_access_token,
        overpass_url,
        mapbox_url,
        request_timeout_secs,
        user_agent,
        radius,
        geocoder_limit,
        debounce_ms,
        history_path,
        history_capacity,
        taxonomy_path,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACEFIND_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
