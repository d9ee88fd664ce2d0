use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{classify::DEFAULT_DUPLICATE_TRIGGER, ticker::DEFAULT_THINKING_TICK};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const SETTINGS_FILE_NAME: &str = "curionest.toml";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("api base url is empty")]
    EmptyBaseUrl,
    #[error("invalid api base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub persist_history: bool,
    pub duplicate_marker: String,
    pub thinking_tick_ms: u64,
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            persist_history: true,
            duplicate_marker: DEFAULT_DUPLICATE_TRIGGER.into(),
            thinking_tick_ms: DEFAULT_THINKING_TICK.as_millis() as u64,
            data_dir: None,
        }
    }
}

impl ClientSettings {
    pub fn thinking_tick(&self) -> Duration {
        Duration::from_millis(self.thinking_tick_ms.max(1))
    }

    /// Directory for durable records; `None` when no per-user dir can be found.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|base| base.join("curionest")))
    }

    pub fn set_api_base_url(&mut self, raw: &str) -> Result<(), SettingsError> {
        self.api_base_url = normalize_base_url(raw)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    persist_history: Option<bool>,
    duplicate_marker: Option<String>,
    thinking_tick_ms: Option<u64>,
    data_dir: Option<PathBuf>,
}

/// Defaults, then `curionest.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    load_settings_with(Some(Path::new(SETTINGS_FILE_NAME)), |name| {
        std::env::var(name).ok()
    })
}

pub fn load_settings_with(
    file: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(path) = file {
        if let Ok(raw) = fs::read_to_string(path) {
            match toml::from_str::<FileSettings>(&raw) {
                Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
                Err(err) => {
                    tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}")
                }
            }
        }
    }

    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    for name in ["CURIONEST_API_URL", "APP__API_BASE_URL"] {
        if let Some(v) = env(name) {
            apply_base_url(&mut settings, &v, name);
        }
    }
    if let Some(v) = env("APP__PERSIST_HISTORY") {
        match parse_bool(&v) {
            Some(parsed) => settings.persist_history = parsed,
            None => tracing::warn!(value = %v, "ignoring invalid APP__PERSIST_HISTORY"),
        }
    }
    if let Some(v) = env("APP__DUPLICATE_MARKER") {
        settings.duplicate_marker = v;
    }
    if let Some(v) = env("APP__THINKING_TICK_MS") {
        match v.parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.thinking_tick_ms = parsed,
            _ => tracing::warn!(value = %v, "ignoring invalid APP__THINKING_TICK_MS"),
        }
    }
    if let Some(v) = env("APP__DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }

    settings
}

fn apply_file_settings(settings: &mut ClientSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        apply_base_url(settings, &v, "api_base_url");
    }
    if let Some(v) = file_cfg.persist_history {
        settings.persist_history = v;
    }
    if let Some(v) = file_cfg.duplicate_marker.filter(|v| !v.is_empty()) {
        settings.duplicate_marker = v;
    }
    if let Some(v) = file_cfg.thinking_tick_ms.filter(|v| *v > 0) {
        settings.thinking_tick_ms = v;
    }
    if let Some(v) = file_cfg.data_dir {
        settings.data_dir = Some(v);
    }
}

fn apply_base_url(settings: &mut ClientSettings, raw: &str, source: &str) {
    if let Err(err) = settings.set_api_base_url(raw) {
        tracing::warn!(source, "ignoring api base url: {err}");
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Validates an http(s) base url and strips trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SettingsError::EmptyBaseUrl);
    }
    let parsed = Url::parse(trimmed).map_err(|err| SettingsError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SettingsError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
