use crate::error::{TrackorError, TrackorResult};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "TRACKOR_SETTINGS";

/// Settings file used when `TRACKOR_SETTINGS` is unset
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// OneVizion connection settings, read once at startup
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Backend host, e.g. `acme.onevizion.com`. May carry a scheme or a
    /// path prefix (`acme.example.com/onevizion`).
    #[serde(rename = "urlOneVizion")]
    pub url_onevizion: String,
    #[serde(rename = "loginOneVizion")]
    pub login_onevizion: String,
    #[serde(rename = "passOneVizion")]
    pub pass_onevizion: String,
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(data: &[u8]) -> TrackorResult<Self> {
        let settings: Self = serde_json::from_slice(data)?;
        if settings.url_onevizion.trim().is_empty() {
            return Err(TrackorError::config_error("urlOneVizion must not be empty"));
        }
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> TrackorResult<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Read settings from the file named by `TRACKOR_SETTINGS`
    pub fn from_env() -> TrackorResult<Self> {
        let path = std::env::var(SETTINGS_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        Self::from_file(path)
    }

    /// Base URL of the Trackor API. A bare host means HTTPS.
    pub fn base_url(&self) -> String {
        let host = self.url_onevizion.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("url_onevizion", &self.url_onevizion)
            .field("login_onevizion", &self.login_onevizion)
            .field("pass_onevizion", &"<redacted>")
            .finish()
    }
}
