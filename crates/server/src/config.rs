use std::{fs, time::Duration};

use serde::Deserialize;
use tracing::warn;
use url::Url;

const SETTINGS_FILE: &str = "server.toml";

/// Relay settings. `summarizer_script` is passed to the program verbatim, so
/// a relative path resolves against the server's working directory, not the
/// binary's location. Start the server from the directory holding the script
/// or configure an absolute path.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub summarizer_program: String,
    pub summarizer_script: String,
    pub summarizer_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            allowed_origins: vec![
                "http://localhost:3000".into(),
                "http://localhost:5173".into(),
                "https://summary-generator-5avd.vercel.app".into(),
            ],
            summarizer_program: "python".into(),
            summarizer_script: "inference.py".into(),
            summarizer_timeout_secs: 120,
        }
    }
}

impl Settings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Zero disables the limit.
    pub fn summarizer_timeout(&self) -> Option<Duration> {
        (self.summarizer_timeout_secs > 0)
            .then(|| Duration::from_secs(self.summarizer_timeout_secs))
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `server.toml` table, then environment. For each
/// setting the `APP__` variable beats the bare one.
pub fn load_settings_from(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match raw.parse::<toml::Table>() {
            Ok(table) => {
                let get = |key: &str| table.get(key).and_then(scalar_to_string);
                apply(&mut settings, get);
            }
            Err(error) => warn!(%error, file = SETTINGS_FILE, "ignoring unparseable settings file"),
        }
    }

    apply(&mut settings, |key| {
        let upper = key.to_ascii_uppercase();
        env(&format!("APP__{upper}")).or_else(|| env(&upper))
    });

    settings
}

fn apply(settings: &mut Settings, get: impl Fn(&str) -> Option<String>) {
    if let Some(v) = get("host") {
        settings.host = v;
    }
    if let Some(v) = get("port") {
        match v.trim().parse::<u16>() {
            Ok(port) => settings.port = port,
            Err(_) => warn!(value = %v, "ignoring invalid port"),
        }
    }
    if let Some(v) = get("allowed_origins") {
        settings.allowed_origins = parse_origins(&v);
    }
    if let Some(v) = get("summarizer_program") {
        settings.summarizer_program = v;
    }
    if let Some(v) = get("summarizer_script") {
        settings.summarizer_script = v;
    }
    if let Some(v) = get("summarizer_timeout_secs") {
        match v.trim().parse::<u64>() {
            Ok(secs) => settings.summarizer_timeout_secs = secs,
            Err(_) => warn!(value = %v, "ignoring invalid summarizer timeout"),
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(toml::Value::as_str)
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    }
}

/// Comma separated origins, normalised to `scheme://host[:port]`.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match Url::parse(origin) {
            Ok(url) if url.has_host() => Some(url.origin().ascii_serialization()),
            _ => {
                warn!(%origin, "dropping invalid allowed origin");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
