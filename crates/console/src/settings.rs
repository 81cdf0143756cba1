//! Build-time configuration.
//!
//! A browser bundle has no process environment, so the `DIAN_*` variables are
//! captured when the crate is compiled.

use dian_observability::LogSettings;
use dian_session::ConsoleConfig;

/// `DIAN_*` values baked into this build.
pub fn baked(key: &str) -> Option<String> {
    let value = match key {
        "DIAN_API_URL" => option_env!("DIAN_API_URL"),
        "DIAN_REQUEST_TIMEOUT_SECS" => option_env!("DIAN_REQUEST_TIMEOUT_SECS"),
        "DIAN_LOG" => option_env!("DIAN_LOG"),
        "DIAN_LOG_JSON" => option_env!("DIAN_LOG_JSON"),
        _ => None,
    };
    value.map(str::to_string)
}

pub fn load() -> anyhow::Result<ConsoleConfig> {
    ConsoleConfig::from_lookup(baked)
}

pub fn log_settings(config: &ConsoleConfig) -> LogSettings {
    LogSettings::new(config.log_filter.clone(), config.log_json)
}
