//! Typed decoding of channel payloads.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use user_store::ActivityKind;

use crate::BridgeError;
use crate::channel::Channel;
use crate::cookies::{CookieFilter, CookieRecord};
use crate::lifecycle::StageSignal;

/// A decoded bridge request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    MinimizeWindow,
    CloseWindow,
    ToggleMaximize,
    IsMaximized,
    ToggleDarkMode,
    UseSystemTheme,
    GetTheme,
    ShowNotification {
        title: String,
        body: String,
    },
    ShowRandomNotification {
        category: String,
    },
    ShowPopulatedNotification {
        category: String,
        overrides: Map<String, Value>,
    },
    GetUserData,
    UpdateUserProfile {
        profile: Map<String, Value>,
    },
    UpdateUserActivity {
        kind: ActivityKind,
        value: f64,
    },
    GetCookies {
        filter: CookieFilter,
    },
    SetCookie {
        cookie: CookieRecord,
    },
    RemoveCookie {
        url: String,
        name: String,
    },
    FlushCookieStore,
    Stage(StageSignal),
}

#[derive(Deserialize)]
struct NotificationArgs {
    title: String,
    body: String,
}

#[derive(Deserialize)]
struct CategoryArgs {
    category: String,
    #[serde(default)]
    overrides: Map<String, Value>,
}

#[derive(Deserialize)]
struct ProfileArgs {
    profile: Map<String, Value>,
}

#[derive(Deserialize)]
struct ActivityArgs {
    kind: ActivityKind,
    value: f64,
}

#[derive(Deserialize)]
struct FilterArgs {
    #[serde(default)]
    filter: Option<CookieFilter>,
}

#[derive(Deserialize)]
struct SetCookieArgs {
    cookie: CookieRecord,
}

#[derive(Deserialize)]
struct RemoveCookieArgs {
    url: String,
    name: String,
}

impl Request {
    /// Decode `payload` for `channel`. A `null` payload is read as `{}`.
    pub fn parse(channel: Channel, payload: Value) -> Result<Self, BridgeError> {
        let payload = match payload {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let request = match channel {
            Channel::MinimizeWindow => Self::MinimizeWindow,
            Channel::CloseWindow => Self::CloseWindow,
            Channel::ToggleMaximize => Self::ToggleMaximize,
            Channel::IsMaximized => Self::IsMaximized,
            Channel::DarkModeToggle => Self::ToggleDarkMode,
            Channel::DarkModeSystem => Self::UseSystemTheme,
            Channel::DarkModeGetTheme => Self::GetTheme,
            Channel::ShowNotification => {
                let args: NotificationArgs = decode(channel, payload)?;
                Self::ShowNotification {
                    title: args.title,
                    body: args.body,
                }
            }
            Channel::ShowRandomNotification => {
                let args: CategoryArgs = decode(channel, payload)?;
                Self::ShowRandomNotification {
                    category: args.category,
                }
            }
            Channel::ShowPopulatedNotification => {
                let args: CategoryArgs = decode(channel, payload)?;
                Self::ShowPopulatedNotification {
                    category: args.category,
                    overrides: args.overrides,
                }
            }
            Channel::GetUserData => Self::GetUserData,
            Channel::UpdateUserProfile => {
                let args: ProfileArgs = decode(channel, payload)?;
                Self::UpdateUserProfile {
                    profile: args.profile,
                }
            }
            Channel::UpdateUserActivity => {
                let args: ActivityArgs = decode(channel, payload)?;
                if !args.value.is_finite() {
                    return Err(invalid(channel, "value must be a finite number"));
                }
                Self::UpdateUserActivity {
                    kind: args.kind,
                    value: args.value,
                }
            }
            Channel::GetCookies => {
                let args: FilterArgs = decode(channel, payload)?;
                Self::GetCookies {
                    filter: args.filter.unwrap_or_default(),
                }
            }
            Channel::SetCookie => {
                let args: SetCookieArgs = decode(channel, payload)?;
                Self::SetCookie {
                    cookie: args.cookie,
                }
            }
            Channel::RemoveCookie => {
                let args: RemoveCookieArgs = decode(channel, payload)?;
                Self::RemoveCookie {
                    url: args.url,
                    name: args.name,
                }
            }
            Channel::FlushCookieStore => Self::FlushCookieStore,
            Channel::SplashComplete => Self::Stage(StageSignal::SplashComplete),
            Channel::WalkthroughComplete => Self::Stage(StageSignal::WalkthroughComplete),
        };
        Ok(request)
    }
}

fn decode<T: DeserializeOwned>(channel: Channel, payload: Value) -> Result<T, BridgeError> {
    serde_json::from_value(payload).map_err(|e| invalid(channel, e.to_string()))
}

fn invalid(channel: Channel, reason: impl Into<String>) -> BridgeError {
    BridgeError::InvalidPayload {
        channel: channel.as_str(),
        reason: reason.into(),
    }
}
