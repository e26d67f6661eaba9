use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::app_config::HarvestConfig;
use crate::params::RunParams;
use crate::ConfigError;

/// Load harvester configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_harvest_config() -> Result<HarvestConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_harvest_config_from_env()
}

/// Load harvester configuration from environment variables already in the process.
///
/// Unlike [`load_harvest_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_harvest_config_from_env() -> Result<HarvestConfig, ConfigError> {
    build_harvest_config(|key| std::env::var(key))
}

/// Build harvester configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables fall back to defaults. Kept
/// separate from the real environment so tests can drive it with a `HashMap`.
fn build_harvest_config<F>(lookup: F) -> Result<HarvestConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_value::<u64>(var, &or_default(var, default))
    };

    let log_level = or_default("HARVEST_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("HARVEST_OUTPUT_DIR", "."));
    let csv_filename = or_default("HARVEST_CSV_FILENAME", "tweets.csv");

    let target_count = usize::try_from(parse_num("HARVEST_TARGET_COUNT", "100")?)
        .map_err(|e| invalid("HARVEST_TARGET_COUNT", e))?;
    let scroll_pause_ms = parse_num("HARVEST_SCROLL_PAUSE_MS", "3000")?;
    let stagnation_threshold = u32::try_from(parse_num("HARVEST_STAGNATION_THRESHOLD", "3")?)
        .map_err(|e| invalid("HARVEST_STAGNATION_THRESHOLD", e))?;

    let run = RunParams::new(
        target_count,
        Duration::from_millis(scroll_pause_ms),
        stagnation_threshold,
    )
    .map_err(param_to_env_var)?;

    let bird_bin = or_default("HARVEST_BIRD_BIN", "bird");
    let bird_page_size = u32::try_from(parse_num("HARVEST_BIRD_PAGE_SIZE", "20")?)
        .map_err(|e| invalid("HARVEST_BIRD_PAGE_SIZE", e))?;
    if bird_page_size == 0 {
        return Err(invalid("HARVEST_BIRD_PAGE_SIZE", "must be greater than zero"));
    }
    let bird_timeout_secs = parse_num("HARVEST_BIRD_TIMEOUT_SECS", "60")?;
    if bird_timeout_secs == 0 {
        return Err(invalid("HARVEST_BIRD_TIMEOUT_SECS", "must be greater than zero"));
    }

    let twitter_auth_token = lookup("TWITTER_AUTH_TOKEN").ok().filter(|s| !s.is_empty());
    let twitter_ct0 = lookup("TWITTER_CT0").ok().filter(|s| !s.is_empty());

    Ok(HarvestConfig {
        log_level,
        output_dir,
        csv_filename,
        run,
        bird_bin,
        bird_page_size,
        bird_timeout: Duration::from_secs(bird_timeout_secs),
        twitter_auth_token,
        twitter_ct0,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| invalid(var, e))
}

/// Reports a rejected run parameter against the env var it was read from.
fn param_to_env_var(err: ConfigError) -> ConfigError {
    match err {
        ConfigError::InvalidParam { param, reason } => {
            let var = match param {
                "target_count" => "HARVEST_TARGET_COUNT",
                "stagnation_threshold" => "HARVEST_STAGNATION_THRESHOLD",
                other => other,
            };
            invalid(var, reason)
        }
        other => other,
    }
}

fn invalid(var: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
