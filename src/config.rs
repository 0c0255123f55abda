//! Process configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::services::auth::AdminCredentials;
use crate::services::contacts::ContactInfo;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SETTINGS_PATH: &str = "data/settings.json";
pub const DEFAULT_SUBSCRIPTIONS_PATH: &str = "data/subscriptions.json";
pub const DEFAULT_SYNC_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub settings_path: PathBuf,
    pub subscriptions_path: PathBuf,
    pub credentials: AdminCredentials,
    /// Pause before a simulated sync returns.
    pub sync_delay: Duration,
    pub cors_permissive: bool,
    pub contacts: ContactInfo,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `SETTINGS_PATH`: default `data/settings.json`
    /// - `SUBSCRIPTIONS_PATH`: default `data/subscriptions.json`
    /// - `ADMIN_EMAIL`, `ADMIN_PASSWORD`: built-in defaults when absent
    /// - `SYNC_DELAY_MS`: default 1000
    /// - `CORS_PERMISSIVE`: default true
    /// - `CONTACT_*`: contact page overrides
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            settings_path: env_path("SETTINGS_PATH", DEFAULT_SETTINGS_PATH),
            subscriptions_path: env_path("SUBSCRIPTIONS_PATH", DEFAULT_SUBSCRIPTIONS_PATH),
            credentials: AdminCredentials::from_env(),
            sync_delay: Duration::from_millis(env_parse("SYNC_DELAY_MS", DEFAULT_SYNC_DELAY_MS)),
            cors_permissive: env_bool("CORS_PERMISSIVE").unwrap_or(true),
            contacts: ContactInfo::from_env(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            subscriptions_path: PathBuf::from(DEFAULT_SUBSCRIPTIONS_PATH),
            credentials: AdminCredentials::default(),
            sync_delay: Duration::from_millis(DEFAULT_SYNC_DELAY_MS),
            cors_permissive: true,
            contacts: ContactInfo::default(),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
