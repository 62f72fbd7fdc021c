use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://eztour.db?mode=rwc";
pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
pub const DEFAULT_USER_AGENT: &str = "eztour/0.1 (place-discovery)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = or_default("DATABASE_URL", DEFAULT_DATABASE_URL);
    let env = parse_environment(&or_default("EZTOUR_ENV", "development"))?;
    let log_level = or_default("EZTOUR_LOG_LEVEL", "info");

    let places_api_key = lookup("PLACES_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let places_base_url = or_default("PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    if !places_base_url.starts_with("http://") && !places_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACES_BASE_URL".to_string(),
            reason: format!("'{places_base_url}' is not an http(s) URL"),
        });
    }
    let places_request_timeout_secs = parse_u64("PLACES_REQUEST_TIMEOUT_SECS", "30")?;
    let places_user_agent = or_default("PLACES_USER_AGENT", DEFAULT_USER_AGENT);
    let places_photo_max_width = parse_u32("PLACES_PHOTO_MAX_WIDTH", "400")?;

    let db_max_connections = parse_u32("EZTOUR_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("EZTOUR_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("EZTOUR_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        places_api_key,
        places_base_url,
        places_request_timeout_secs,
        places_user_agent,
        places_photo_max_width,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "EZTOUR_ENV".to_string(),
            reason: format!("expected development, test or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
