//! The channel allow-list.

use std::fmt;
use std::str::FromStr;

use crate::BridgeError;

/// Every channel the page is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    MinimizeWindow,
    CloseWindow,
    ToggleMaximize,
    IsMaximized,
    DarkModeToggle,
    DarkModeSystem,
    DarkModeGetTheme,
    ShowNotification,
    ShowRandomNotification,
    ShowPopulatedNotification,
    GetUserData,
    UpdateUserProfile,
    UpdateUserActivity,
    GetCookies,
    SetCookie,
    RemoveCookie,
    FlushCookieStore,
    SplashComplete,
    WalkthroughComplete,
}

/// How a channel is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// No response; failures are only logged.
    FireAndForget,
    /// Answers immediately from host state.
    Query,
    /// Caller awaits a value or an error.
    RequestResponse,
    /// One-shot stage signal for the window lifecycle.
    Lifecycle,
}

impl Channel {
    pub const ALL: [Channel; 19] = [
        Channel::MinimizeWindow,
        Channel::CloseWindow,
        Channel::ToggleMaximize,
        Channel::IsMaximized,
        Channel::DarkModeToggle,
        Channel::DarkModeSystem,
        Channel::DarkModeGetTheme,
        Channel::ShowNotification,
        Channel::ShowRandomNotification,
        Channel::ShowPopulatedNotification,
        Channel::GetUserData,
        Channel::UpdateUserProfile,
        Channel::UpdateUserActivity,
        Channel::GetCookies,
        Channel::SetCookie,
        Channel::RemoveCookie,
        Channel::FlushCookieStore,
        Channel::SplashComplete,
        Channel::WalkthroughComplete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MinimizeWindow => "minimize-window",
            Self::CloseWindow => "close-window",
            Self::ToggleMaximize => "toggle-maximize",
            Self::IsMaximized => "is-maximized",
            Self::DarkModeToggle => "dark-mode:toggle",
            Self::DarkModeSystem => "dark-mode:system",
            Self::DarkModeGetTheme => "dark-mode:get-theme",
            Self::ShowNotification => "show-notification",
            Self::ShowRandomNotification => "show-random-notification",
            Self::ShowPopulatedNotification => "show-populated-notification",
            Self::GetUserData => "get-user-data",
            Self::UpdateUserProfile => "update-user-profile",
            Self::UpdateUserActivity => "update-user-activity",
            Self::GetCookies => "get-cookies",
            Self::SetCookie => "set-cookie",
            Self::RemoveCookie => "remove-cookie",
            Self::FlushCookieStore => "flush-cookie-store",
            Self::SplashComplete => "splash-complete",
            Self::WalkthroughComplete => "walkthrough-complete",
        }
    }

    pub fn kind(self) -> ChannelKind {
        match self {
            Self::MinimizeWindow | Self::CloseWindow | Self::ToggleMaximize => {
                ChannelKind::FireAndForget
            }
            Self::IsMaximized => ChannelKind::Query,
            Self::SplashComplete | Self::WalkthroughComplete => ChannelKind::Lifecycle,
            _ => ChannelKind::RequestResponse,
        }
    }

    /// Whether the caller gets a result back.
    pub fn expects_response(self) -> bool {
        matches!(self.kind(), ChannelKind::Query | ChannelKind::RequestResponse)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownChannel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique_and_parse_back() {
        let mut seen = HashSet::new();
        for c in Channel::ALL {
            assert!(seen.insert(c.as_str()), "duplicate channel {c}");
            assert_eq!(c.as_str().parse::<Channel>().unwrap(), c);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        for name in ["", "eval", "open-devtools", "dark-mode", "Get-Cookies"] {
            assert!(matches!(
                name.parse::<Channel>(),
                Err(BridgeError::UnknownChannel(_))
            ));
        }
    }

    #[test]
    fn window_controls_are_fire_and_forget() {
        assert_eq!(Channel::MinimizeWindow.kind(), ChannelKind::FireAndForget);
        assert_eq!(Channel::IsMaximized.kind(), ChannelKind::Query);
        assert_eq!(Channel::SplashComplete.kind(), ChannelKind::Lifecycle);
        assert!(Channel::GetCookies.expects_response());
        assert!(!Channel::CloseWindow.expects_response());
    }
}
