//! Light/dark theme control.

use serde::{Deserialize, Serialize};

use crate::HostError;

/// Where the effective theme comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSource {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub should_use_dark_colors: bool,
    pub theme_source: ThemeSource,
}

/// Host capability for reading and forcing the app theme.
pub trait ThemeHost: Send + Sync {
    fn theme(&self) -> Result<ThemeState, HostError>;
    fn set_theme_source(&self, source: ThemeSource) -> Result<(), HostError>;
}

/// Flip between forced light and forced dark based on what is showing now.
/// Returns whether dark colors are in use afterwards.
pub fn toggle<H: ThemeHost + ?Sized>(host: &H) -> Result<bool, HostError> {
    let current = host.theme()?;
    let next = if current.should_use_dark_colors {
        ThemeSource::Light
    } else {
        ThemeSource::Dark
    };
    host.set_theme_source(next)?;
    Ok(host.theme()?.should_use_dark_colors)
}
