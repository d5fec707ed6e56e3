use std::{collections::HashMap, fs};

use command_queue::QueueSettings;
use serde::Deserialize;
use shared::domain::DEFAULT_MESSAGE_AREA_SELECTOR;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub message_area_selector: String,
    pub fadeout_time_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            message_area_selector: DEFAULT_MESSAGE_AREA_SELECTOR.into(),
            fadeout_time_ms: 5000,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn queue_settings(&self) -> QueueSettings {
        QueueSettings {
            message_area_selector: self.message_area_selector.clone(),
            fadeout_time_ms: self.fadeout_time_ms,
        }
    }
}

/// Defaults, then `server.toml`, then the environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(cfg) => cfg,
        Err(error) => {
            warn!(%error, "ignoring unreadable server.toml");
            return;
        }
    };

    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("message_area_selector")
        .and_then(toml::Value::as_str)
    {
        settings.message_area_selector = v.to_string();
    }
    if let Some(v) = file_cfg.get("fadeout_time_ms") {
        match v.as_integer().and_then(|ms| u64::try_from(ms).ok()) {
            Some(ms) => settings.fadeout_time_ms = ms,
            None => warn!(value = %v, "fadeout_time_ms must be a non-negative integer"),
        }
    }
    if let Some(v) = file_cfg.get("log_filter").and_then(toml::Value::as_str) {
        settings.log_filter = v.to_string();
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("APP__MESSAGE_AREA_SELECTOR") {
        settings.message_area_selector = v;
    }

    if let Some(v) = lookup("APP__FADEOUT_TIME_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.fadeout_time_ms = parsed;
        }
    }

    if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
