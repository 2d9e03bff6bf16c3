//! Window and theme control backed by Tauri webview windows.

use std::sync::{Mutex, PoisonError};

use shell_bridge::{HostError, Stage, ThemeHost, ThemeSource, ThemeState, WindowHost};
use tauri::{AppHandle, Manager, Theme, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::config::AppConfig;

/// Page-side API injected into every stage window before its scripts run.
const PAGE_BRIDGE: &str = include_str!("bridge.js");

/// Delayed welcome notification for the main page.
const WELCOME_GREETING: &str = include_str!("welcome.js");

struct StageWindow {
    title: &'static str,
    width: f64,
    height: f64,
    resizable: bool,
}

fn stage_window(stage: Stage) -> StageWindow {
    match stage {
        Stage::Splash => StageWindow {
            title: "PiPilot",
            width: 480.0,
            height: 320.0,
            resizable: false,
        },
        Stage::Walkthrough => StageWindow {
            title: "Welcome to PiPilot",
            width: 900.0,
            height: 600.0,
            resizable: false,
        },
        Stage::Main => StageWindow {
            title: "PiPilot",
            width: 1280.0,
            height: 800.0,
            resizable: true,
        },
    }
}

/// Runtime versions read by the page's `versions` API.
fn versions_script(app: &str, webview: &str) -> String {
    let versions = serde_json::json!({
        "app": app,
        "tauri": tauri::VERSION,
        "webview": webview,
    });
    format!("window.__PIPILOT_VERSIONS__ = {versions};")
}

fn init_scripts(stage: Stage, versions: &str) -> Vec<&str> {
    let mut scripts = vec![versions, PAGE_BRIDGE];
    if stage == Stage::Main {
        scripts.push(WELCOME_GREETING);
    }
    scripts
}

/// [`WindowHost`] and [`ThemeHost`] over the running Tauri app.
pub struct TauriHost {
    app: AppHandle,
    config: AppConfig,
    theme_source: Mutex<ThemeSource>,
    versions: String,
}

impl TauriHost {
    pub fn new(app: AppHandle, config: AppConfig) -> Self {
        let webview = tauri::webview_version().unwrap_or_else(|e| {
            tracing::warn!("Could not read web view version: {e}");
            String::from("unknown")
        });
        let versions = versions_script(&app.package_info().version.to_string(), &webview);
        Self {
            app,
            config,
            theme_source: Mutex::new(ThemeSource::System),
            versions,
        }
    }

    fn window(&self, label: &str) -> Result<WebviewWindow, HostError> {
        self.app
            .get_webview_window(label)
            .ok_or_else(|| HostError::WindowNotFound(label.to_string()))
    }

    fn source(&self) -> ThemeSource {
        *self.theme_source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stage_url(&self, stage: Stage) -> Result<WebviewUrl, HostError> {
        match stage {
            Stage::Splash => Ok(WebviewUrl::App("splash.html".into())),
            Stage::Walkthrough => Ok(WebviewUrl::App("walkthrough.html".into())),
            Stage::Main => Url::parse(&self.config.remote_url)
                .map(WebviewUrl::External)
                .map_err(|e| HostError::Backend(format!("{}: {e}", self.config.remote_url))),
        }
    }
}

fn forced_theme(source: ThemeSource) -> Option<Theme> {
    match source {
        ThemeSource::System => None,
        ThemeSource::Light => Some(Theme::Light),
        ThemeSource::Dark => Some(Theme::Dark),
    }
}

fn backend(e: tauri::Error) -> HostError {
    HostError::Backend(e.to_string())
}

impl WindowHost for TauriHost {
    fn focused_window(&self) -> Option<String> {
        self.app
            .webview_windows()
            .into_iter()
            .find(|(_, window)| window.is_focused().unwrap_or(false))
            .map(|(label, _)| label)
    }

    fn has_window(&self, label: &str) -> bool {
        self.app.get_webview_window(label).is_some()
    }

    fn minimize(&self, label: &str) -> Result<(), HostError> {
        self.window(label)?.minimize().map_err(backend)
    }

    fn toggle_maximize(&self, label: &str) -> Result<(), HostError> {
        let window = self.window(label)?;
        if window.is_maximized().map_err(backend)? {
            window.unmaximize().map_err(backend)
        } else {
            window.maximize().map_err(backend)
        }
    }

    fn close(&self, label: &str) -> Result<(), HostError> {
        self.window(label)?.close().map_err(backend)
    }

    fn is_maximized(&self, label: &str) -> Result<bool, HostError> {
        self.window(label)?.is_maximized().map_err(backend)
    }

    fn open_stage(&self, stage: Stage) -> Result<(), HostError> {
        let label = stage.label();
        if let Some(window) = self.app.get_webview_window(label) {
            let _ = window.unminimize();
            return window.set_focus().map_err(backend);
        }

        let shape = stage_window(stage);
        let mut builder = WebviewWindowBuilder::new(&self.app, label, self.stage_url(stage)?)
            .title(shape.title)
            .inner_size(shape.width, shape.height)
            .resizable(shape.resizable)
            .decorations(false)
            .center()
            .theme(forced_theme(self.source()));
        for script in init_scripts(stage, &self.versions) {
            builder = builder.initialization_script(script);
        }

        if stage == Stage::Main {
            builder = builder
                .user_agent(&self.config.user_agent)
                .min_inner_size(800.0, 600.0);
        }

        builder.build().map_err(backend)?;
        tracing::info!("Opened {label} window");
        Ok(())
    }
}

impl ThemeHost for TauriHost {
    fn theme(&self) -> Result<ThemeState, HostError> {
        let theme_source = self.source();
        let should_use_dark_colors = match forced_theme(theme_source) {
            Some(theme) => theme == Theme::Dark,
            None => match self.app.webview_windows().into_values().next() {
                Some(window) => window.theme().map_err(backend)? == Theme::Dark,
                None => false,
            },
        };
        Ok(ThemeState {
            should_use_dark_colors,
            theme_source,
        })
    }

    fn set_theme_source(&self, source: ThemeSource) -> Result<(), HostError> {
        *self.theme_source.lock().unwrap_or_else(PoisonError::into_inner) = source;
        for window in self.app.webview_windows().values() {
            window.set_theme(forced_theme(source)).map_err(backend)?;
        }
        tracing::info!("Theme source set to {source:?}");
        Ok(())
    }
}
