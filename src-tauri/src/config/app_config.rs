//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;

use url::Url;

pub const DEFAULT_REMOTE_URL: &str = "https://pipilot.dev";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36 PiPilotDesktop";
const APP_DIR_NAME: &str = "dev.pipilot.desktop";

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Page loaded into the main window. Always an absolute http(s) url.
    pub remote_url: String,
    pub user_agent: String,
    pub data_dir: PathBuf,
    /// Keep the process alive with no windows open.
    pub keep_resident: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_REMOTE_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            data_dir: default_data_dir(),
            keep_resident: cfg!(target_os = "macos"),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a key lookup, falling back to defaults
    /// for anything unset or invalid.
    pub fn load(get: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let remote_url = match g("PIPILOT_REMOTE_URL") {
            Some(raw) => match parse_remote_url(&raw) {
                Some(url) => url,
                None => {
                    tracing::warn!("Ignoring invalid PIPILOT_REMOTE_URL: {raw}");
                    defaults.remote_url
                }
            },
            None => defaults.remote_url,
        };

        let keep_resident = match g("PIPILOT_KEEP_RESIDENT") {
            Some(v) => parse_bool(&v).unwrap_or_else(|| {
                tracing::warn!("Ignoring invalid PIPILOT_KEEP_RESIDENT: {v}");
                defaults.keep_resident
            }),
            None => defaults.keep_resident,
        };

        Self {
            remote_url,
            user_agent: g("PIPILOT_USER_AGENT").unwrap_or(defaults.user_agent),
            data_dir: g("PIPILOT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            keep_resident,
        }
    }
}

/// Priority: platform data dir > home dir > current dir.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn parse_remote_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    (matches!(url.scheme(), "http" | "https") && url.host_str().is_some()).then(|| url.into())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
