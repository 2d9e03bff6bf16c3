//! Request dispatch for the page-to-host channels.

use std::sync::{Mutex, MutexGuard, PoisonError};

use notify_catalog::{Emitter, NotificationSink, PopulateContext};
use serde::Serialize;
use serde_json::Value;
use user_store::{UserState, UserStore};

use crate::channel::{Channel, ChannelKind};
use crate::cookies::CookieJar;
use crate::lifecycle::{Lifecycle, Stage, StageSignal, Transition};
use crate::request::Request;
use crate::theme::{self, ThemeHost, ThemeSource};
use crate::window::{self, WindowHost};
use crate::{BridgeError, HostError};

/// Host side of the page bridge.
///
/// `H` supplies window and theme control, `C` the web view cookie jar and
/// `S` the OS notification center.
pub struct Bridge<H, C, S> {
    host: H,
    cookies: C,
    notifications: Emitter<S>,
    store: UserStore,
    lifecycle: Mutex<Lifecycle>,
}

impl<H, C, S> Bridge<H, C, S>
where
    H: WindowHost + ThemeHost,
    C: CookieJar,
    S: NotificationSink,
{
    pub fn new(host: H, cookies: C, sink: S, store: UserStore) -> Self {
        Self {
            host,
            cookies,
            notifications: Emitter::new(sink),
            store,
            lifecycle: Mutex::new(Lifecycle::new()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn cookies(&self) -> &C {
        &self.cookies
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn notifications(&self) -> &Emitter<S> {
        &self.notifications
    }

    /// Open the first stage window.
    pub fn start(&self) -> Result<(), HostError> {
        let stage = self.lifecycle().stage();
        tracing::info!("Opening {} window", stage.label());
        self.host.open_stage(stage)
    }

    pub fn stage(&self) -> Stage {
        self.lifecycle().stage()
    }

    /// Whether a stage window swap is in progress. The last window being
    /// closed during a swap must not end the process.
    pub fn is_transitioning(&self) -> bool {
        self.lifecycle().is_transitioning()
    }

    /// Recreate the main window after the app is reactivated with every
    /// window closed. Returns whether a window was opened.
    pub fn reopen(&self) -> bool {
        if window::any_stage_window(&self.host) {
            return false;
        }
        let stage = self.lifecycle().reopen();
        tracing::info!("Reopening {} window", stage.label());
        match self.host.open_stage(stage) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to reopen {} window: {e}", stage.label());
                false
            }
        }
    }

    /// Handle a request/response or query channel.
    ///
    /// `origin` is the label of the sending window when known.
    pub async fn invoke(
        &self,
        origin: Option<&str>,
        channel: &str,
        payload: Value,
    ) -> Result<Value, BridgeError> {
        let channel: Channel = channel.parse()?;
        if !channel.expects_response() {
            return Err(BridgeError::NotInvokable(channel.as_str()));
        }
        let request = Request::parse(channel, payload)?;

        match request {
            Request::IsMaximized => {
                let maximized = match window::resolve_target(&self.host, origin) {
                    Some(label) => self.host.is_maximized(&label)?,
                    None => false,
                };
                to_value(maximized)
            }
            Request::ToggleDarkMode => to_value(theme::toggle(&self.host)?),
            Request::UseSystemTheme => {
                self.host.set_theme_source(ThemeSource::System)?;
                Ok(Value::Null)
            }
            Request::GetTheme => to_value(self.host.theme()?),
            Request::ShowNotification { title, body } => {
                to_value(self.notifications.show(&title, &body))
            }
            Request::ShowRandomNotification { category } => {
                to_value(self.notifications.show_random(&category))
            }
            Request::ShowPopulatedNotification {
                category,
                overrides,
            } => {
                let ctx = populate_context(&self.store.snapshot());
                to_value(
                    self.notifications
                        .show_populated(&category, &overrides, &ctx),
                )
            }
            Request::GetUserData => to_value(self.store.snapshot()),
            Request::UpdateUserProfile { profile } => to_value(self.store.update_profile(profile)?),
            Request::UpdateUserActivity { kind, value } => {
                to_value(self.store.update_activity(kind, value))
            }
            Request::GetCookies { filter } => to_value(self.cookies.get(&filter).await?),
            Request::SetCookie { cookie } => {
                self.cookies.set(cookie.normalized()?).await?;
                Ok(Value::Null)
            }
            Request::RemoveCookie { url, name } => {
                self.cookies.remove(&url, &name).await?;
                Ok(Value::Null)
            }
            Request::FlushCookieStore => {
                self.cookies.flush().await?;
                Ok(Value::Null)
            }
            Request::MinimizeWindow
            | Request::CloseWindow
            | Request::ToggleMaximize
            | Request::Stage(_) => Err(BridgeError::NotInvokable(channel.as_str())),
        }
    }

    /// Handle a fire-and-forget or lifecycle channel. Nothing is reported
    /// back to the page; problems are logged.
    pub fn send(&self, origin: Option<&str>, channel: &str, payload: Value) {
        let channel: Channel = match channel.parse() {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Ignoring message: {e}");
                return;
            }
        };
        if !matches!(
            channel.kind(),
            ChannelKind::FireAndForget | ChannelKind::Lifecycle
        ) {
            tracing::warn!("Ignoring message on {channel}: channel expects invoke");
            return;
        }
        let request = match Request::parse(channel, payload) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Ignoring message: {e}");
                return;
            }
        };

        let result = match request {
            Request::Stage(signal) => self.advance(signal, origin),
            Request::MinimizeWindow => self.control(origin, |host, label| host.minimize(label)),
            Request::CloseWindow => self.control(origin, |host, label| host.close(label)),
            Request::ToggleMaximize => {
                self.control(origin, |host, label| host.toggle_maximize(label))
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            tracing::error!("{channel} failed: {e}");
        }
    }

    fn control(
        &self,
        origin: Option<&str>,
        op: impl FnOnce(&H, &str) -> Result<(), HostError>,
    ) -> Result<(), HostError> {
        match window::resolve_target(&self.host, origin) {
            Some(label) => op(&self.host, &label),
            None => {
                tracing::warn!("No window to target for window control");
                Ok(())
            }
        }
    }

    fn advance(&self, signal: StageSignal, origin: Option<&str>) -> Result<(), HostError> {
        let transition = self.lifecycle().advance(signal, origin);
        let Some(Transition { from, to }) = transition else {
            tracing::warn!("Ignoring {signal:?} in stage {:?}", self.stage());
            return Ok(());
        };
        tracing::info!("Stage {} -> {}", from.label(), to.label());

        if let Err(e) = self.host.close(from.label()) {
            tracing::warn!("Failed to close {} window: {e}", from.label());
        }
        let opened = self.host.open_stage(to);
        self.lifecycle().finish_transition();
        opened
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Live values for notification placeholders.
pub fn populate_context(state: &UserState) -> PopulateContext {
    let first_name = state.profile.first_name.trim();
    PopulateContext {
        version: state.app.version.clone(),
        first_name: (!first_name.is_empty()).then(|| first_name.to_string()),
        commits_today: state.activity.commits_today,
        hours_today: state.activity.hours_today,
        tasks_completed: state.activity.tasks_completed,
        current_streak: state.activity.current_streak,
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, BridgeError> {
    Ok(serde_json::to_value(value)?)
}
