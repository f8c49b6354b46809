use crate::app_config::{AppConfig, Environment, GenerationConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
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
/// Returns `ConfigError` if values are present but invalid.
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
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_raw = or_default("KOLSCOPE_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .map_err(|e| invalid("KOLSCOPE_BIND_ADDR", e.to_string()))?;

    let env = parse_environment(&or_default("KOLSCOPE_ENV", "development"))?;
    let log_level = or_default("KOLSCOPE_LOG_LEVEL", "info");

    // An empty key is treated the same as an absent one.
    let api_key = lookup("OPENAI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let base_url = or_default("KOLSCOPE_GENERATION_BASE_URL", "https://api.openai.com/v1");
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "KOLSCOPE_GENERATION_BASE_URL",
            format!("expected an http(s) URL, got '{base_url}'"),
        ));
    }

    let model = or_default("KOLSCOPE_GENERATION_MODEL", "gpt-4o-mini");

    let timeout_secs = or_default("KOLSCOPE_GENERATION_TIMEOUT_SECS", "60")
        .parse::<u64>()
        .map_err(|e| invalid("KOLSCOPE_GENERATION_TIMEOUT_SECS", e.to_string()))?;
    if timeout_secs == 0 {
        return Err(invalid(
            "KOLSCOPE_GENERATION_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let temperature = or_default("KOLSCOPE_GENERATION_TEMPERATURE", "0.7")
        .parse::<f32>()
        .map_err(|e| invalid("KOLSCOPE_GENERATION_TEMPERATURE", e.to_string()))?;
    if !(0.0..=2.0).contains(&temperature) {
        return Err(invalid(
            "KOLSCOPE_GENERATION_TEMPERATURE",
            format!("must be within 0.0..=2.0, got {temperature}"),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        generation: GenerationConfig {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout_secs,
            temperature,
        },
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KOLSCOPE_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
