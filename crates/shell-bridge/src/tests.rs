use std::collections::HashSet;
use std::sync::Mutex;

use notify_catalog::{NotificationSink, SinkError};
use serde_json::{Value, json};
use tempfile::TempDir;
use user_store::{USER_DATA_FILE, UserStore};

use crate::cookies::{CookieError, CookieFilter, CookieJar, CookieRecord};
use crate::lifecycle::Stage;
use crate::theme::{ThemeHost, ThemeSource, ThemeState};
use crate::window::WindowHost;
use crate::{Bridge, BridgeError, HostError};

#[derive(Default)]
struct HostState {
    open: Vec<String>,
    focused: Option<String>,
    maximized: HashSet<String>,
    minimized: Vec<String>,
    source: ThemeSource,
    system_dark: bool,
    log: Vec<String>,
}

#[derive(Default)]
struct FakeHost {
    state: Mutex<HostState>,
}

impl FakeHost {
    fn with_windows(labels: &[&str], focused: Option<&str>) -> Self {
        let host = Self::default();
        {
            let mut s = host.state.lock().unwrap();
            s.open = labels.iter().map(|l| l.to_string()).collect();
            s.focused = focused.map(str::to_string);
        }
        host
    }
}

impl WindowHost for FakeHost {
    fn focused_window(&self) -> Option<String> {
        self.state.lock().unwrap().focused.clone()
    }

    fn has_window(&self, label: &str) -> bool {
        self.state.lock().unwrap().open.iter().any(|l| l == label)
    }

    fn minimize(&self, label: &str) -> Result<(), HostError> {
        self.state.lock().unwrap().minimized.push(label.to_string());
        Ok(())
    }

    fn toggle_maximize(&self, label: &str) -> Result<(), HostError> {
        let mut s = self.state.lock().unwrap();
        if !s.maximized.remove(label) {
            s.maximized.insert(label.to_string());
        }
        Ok(())
    }

    fn close(&self, label: &str) -> Result<(), HostError> {
        let mut s = self.state.lock().unwrap();
        let before = s.open.len();
        s.open.retain(|l| l != label);
        if s.open.len() == before {
            return Err(HostError::WindowNotFound(label.to_string()));
        }
        s.log.push(format!("close:{label}"));
        if s.focused.as_deref() == Some(label) {
            s.focused = None;
        }
        Ok(())
    }

    fn is_maximized(&self, label: &str) -> Result<bool, HostError> {
        Ok(self.state.lock().unwrap().maximized.contains(label))
    }

    fn open_stage(&self, stage: Stage) -> Result<(), HostError> {
        let mut s = self.state.lock().unwrap();
        s.open.push(stage.label().to_string());
        s.focused = Some(stage.label().to_string());
        s.log.push(format!("open:{}", stage.label()));
        Ok(())
    }
}

impl ThemeHost for FakeHost {
    fn theme(&self) -> Result<ThemeState, HostError> {
        let s = self.state.lock().unwrap();
        let dark = match s.source {
            ThemeSource::System => s.system_dark,
            ThemeSource::Light => false,
            ThemeSource::Dark => true,
        };
        Ok(ThemeState {
            should_use_dark_colors: dark,
            theme_source: s.source,
        })
    }

    fn set_theme_source(&self, source: ThemeSource) -> Result<(), HostError> {
        self.state.lock().unwrap().source = source;
        Ok(())
    }
}

#[derive(Default)]
struct MemoryCookieJar {
    cookies: Mutex<Vec<CookieRecord>>,
    flushes: Mutex<u32>,
}

impl CookieJar for MemoryCookieJar {
    async fn get(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>, CookieError> {
        let compiled = filter.compile()?;
        let cookies = self.cookies.lock().unwrap();
        Ok(cookies.iter().filter(|c| compiled.matches(c)).cloned().collect())
    }

    async fn set(&self, mut record: CookieRecord) -> Result<(), CookieError> {
        record.url = None;
        let mut cookies = self.cookies.lock().unwrap();
        cookies.retain(|c| !c.same_slot(&record));
        cookies.push(record);
        Ok(())
    }

    async fn remove(&self, url: &str, name: &str) -> Result<(), CookieError> {
        let filter = CookieFilter::for_url_and_name(url, name);
        let compiled = filter.compile()?;
        self.cookies.lock().unwrap().retain(|c| !compiled.matches(c));
        Ok(())
    }

    async fn flush(&self) -> Result<(), CookieError> {
        *self.flushes.lock().unwrap() += 1;
        Ok(())
    }
}

struct RecordingSink {
    supported: bool,
    shown: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    fn new(supported: bool) -> Self {
        Self {
            supported,
            shown: Mutex::new(Vec::new()),
        }
    }
}

impl NotificationSink for RecordingSink {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn display(&self, title: &str, body: &str) -> Result<(), SinkError> {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

type TestBridge = Bridge<FakeHost, MemoryCookieJar, RecordingSink>;

async fn bridge_with(host: FakeHost, dir: &TempDir) -> TestBridge {
    let store = UserStore::load(dir.path().join(USER_DATA_FILE), "1.0.0").await;
    Bridge::new(host, MemoryCookieJar::default(), RecordingSink::new(true), store)
}

fn log(bridge: &TestBridge) -> Vec<String> {
    bridge.host().state.lock().unwrap().log.clone()
}

fn open_windows(bridge: &TestBridge) -> Vec<String> {
    bridge.host().state.lock().unwrap().open.clone()
}

#[tokio::test]
async fn stages_run_in_order_and_end_with_one_main_window() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    bridge.start().unwrap();
    assert_eq!(open_windows(&bridge), ["splash"]);

    bridge.send(Some("splash"), "splash-complete", Value::Null);
    assert_eq!(bridge.stage(), Stage::Walkthrough);
    assert!(!bridge.is_transitioning());

    bridge.send(Some("walkthrough"), "walkthrough-complete", Value::Null);
    assert_eq!(bridge.stage(), Stage::Main);
    assert_eq!(open_windows(&bridge), ["main"]);
    assert_eq!(
        log(&bridge),
        [
            "open:splash",
            "close:splash",
            "open:walkthrough",
            "close:walkthrough",
            "open:main"
        ]
    );
}

#[tokio::test]
async fn walkthrough_complete_before_splash_does_nothing() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;
    bridge.start().unwrap();

    bridge.send(None, "walkthrough-complete", Value::Null);
    assert_eq!(bridge.stage(), Stage::Splash);
    assert_eq!(open_windows(&bridge), ["splash"]);

    bridge.send(Some("splash"), "splash-complete", Value::Null);
    bridge.send(Some("splash"), "splash-complete", Value::Null);
    assert_eq!(open_windows(&bridge), ["walkthrough"]);
}

#[tokio::test]
async fn reopen_recreates_main_only_when_nothing_is_open() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::with_windows(&["main"], None), &dir).await;
    assert!(!bridge.reopen());

    bridge.host().close("main").unwrap();
    assert!(bridge.reopen());
    assert_eq!(open_windows(&bridge), ["main"]);
    assert_eq!(bridge.stage(), Stage::Main);
}

#[tokio::test]
async fn unknown_channels_are_rejected_or_ignored() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    let err = bridge.invoke(None, "open-devtools", Value::Null).await.unwrap_err();
    assert!(matches!(err, BridgeError::UnknownChannel(name) if name == "open-devtools"));

    bridge.send(None, "open-devtools", Value::Null);
    assert!(log(&bridge).is_empty());
}

#[tokio::test]
async fn channel_kinds_are_enforced() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::with_windows(&["main"], Some("main")), &dir).await;

    let err = bridge.invoke(None, "close-window", Value::Null).await.unwrap_err();
    assert!(matches!(err, BridgeError::NotInvokable("close-window")));
    assert_eq!(open_windows(&bridge), ["main"]);

    // request/response channels are ignored on the fire-and-forget path
    bridge.send(None, "dark-mode:toggle", Value::Null);
    assert_eq!(
        bridge.host().theme().unwrap().theme_source,
        ThemeSource::System
    );
}

#[tokio::test]
async fn window_controls_target_the_sender_before_focus() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::with_windows(&["splash", "main"], Some("main"));
    let bridge = bridge_with(host, &dir).await;

    bridge.send(Some("splash"), "minimize-window", Value::Null);
    bridge.send(None, "minimize-window", Value::Null);
    bridge.send(Some("gone"), "minimize-window", Value::Null);
    assert_eq!(
        bridge.host().state.lock().unwrap().minimized,
        ["splash", "main", "main"]
    );
}

#[tokio::test]
async fn maximize_toggles_and_reports() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::with_windows(&["main"], Some("main")), &dir).await;

    let before = bridge.invoke(Some("main"), "is-maximized", Value::Null).await.unwrap();
    assert_eq!(before, json!(false));

    bridge.send(Some("main"), "toggle-maximize", Value::Null);
    let after = bridge.invoke(Some("main"), "is-maximized", Value::Null).await.unwrap();
    assert_eq!(after, json!(true));
}

#[tokio::test]
async fn is_maximized_without_any_window_is_false() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;
    let value = bridge.invoke(None, "is-maximized", Value::Null).await.unwrap();
    assert_eq!(value, json!(false));
}

#[tokio::test]
async fn dark_mode_channels() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::default();
    host.state.lock().unwrap().system_dark = true;
    let bridge = bridge_with(host, &dir).await;

    let theme = bridge.invoke(None, "dark-mode:get-theme", Value::Null).await.unwrap();
    assert_eq!(theme, json!({ "shouldUseDarkColors": true, "themeSource": "system" }));

    let dark = bridge.invoke(None, "dark-mode:toggle", Value::Null).await.unwrap();
    assert_eq!(dark, json!(false));

    let reset = bridge.invoke(None, "dark-mode:system", Value::Null).await.unwrap();
    assert_eq!(reset, Value::Null);
    assert!(bridge.host().theme().unwrap().should_use_dark_colors);
}

#[tokio::test]
async fn cookies_set_are_returned_by_get() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    for (name, value) in [("session", "abc"), ("theme", "dark")] {
        bridge
            .invoke(
                None,
                "set-cookie",
                json!({ "cookie": { "url": "https://pipilot.dev/", "name": name, "value": value } }),
            )
            .await
            .unwrap();
    }

    let all = bridge.invoke(None, "get-cookies", json!({})).await.unwrap();
    let cookies: Vec<CookieRecord> = serde_json::from_value(all).unwrap();
    for name in ["session", "theme"] {
        assert!(cookies.iter().any(|c| c.name == name && c.domain.as_deref() == Some("pipilot.dev")));
    }

    let one = bridge
        .invoke(
            None,
            "get-cookies",
            json!({ "filter": { "name": "session" } }),
        )
        .await
        .unwrap();
    assert_eq!(one.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn remove_cookie_then_flush() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    bridge
        .invoke(
            None,
            "set-cookie",
            json!({ "cookie": { "url": "https://pipilot.dev/", "name": "session", "value": "abc" } }),
        )
        .await
        .unwrap();
    bridge
        .invoke(
            None,
            "remove-cookie",
            json!({ "url": "https://pipilot.dev/", "name": "session" }),
        )
        .await
        .unwrap();
    // removing again is not an error
    bridge
        .invoke(
            None,
            "remove-cookie",
            json!({ "url": "https://pipilot.dev/", "name": "session" }),
        )
        .await
        .unwrap();

    let all = bridge.invoke(None, "get-cookies", Value::Null).await.unwrap();
    assert_eq!(all, json!([]));

    bridge.invoke(None, "flush-cookie-store", Value::Null).await.unwrap();
    assert_eq!(*bridge.cookies().flushes.lock().unwrap(), 1);
}

#[tokio::test]
async fn invalid_cookies_are_rejected() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    let no_url = bridge
        .invoke(None, "set-cookie", json!({ "cookie": { "name": "a", "value": "b" } }))
        .await
        .unwrap_err();
    assert!(matches!(no_url, BridgeError::Cookie(CookieError::InvalidCookie(_))));

    let foreign = bridge
        .invoke(
            None,
            "set-cookie",
            json!({ "cookie": { "url": "https://pipilot.dev", "name": "a", "domain": "example.com" } }),
        )
        .await
        .unwrap_err();
    assert!(matches!(foreign, BridgeError::Cookie(_)));

    let bad_filter = bridge
        .invoke(None, "get-cookies", json!({ "filter": { "url": "not a url" } }))
        .await
        .unwrap_err();
    assert!(matches!(bad_filter, BridgeError::Cookie(CookieError::InvalidFilter(_))));
}

#[tokio::test]
async fn notifications_report_success_as_a_boolean() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    let unknown = bridge
        .invoke(None, "show-random-notification", json!({ "category": "nope" }))
        .await
        .unwrap();
    assert_eq!(unknown, json!(false));

    let shown = bridge
        .invoke(None, "show-notification", json!({ "title": "Hi", "body": "There" }))
        .await
        .unwrap();
    assert_eq!(shown, json!(true));

    let random = bridge
        .invoke(None, "show-random-notification", json!({ "category": "onboarding" }))
        .await
        .unwrap();
    assert_eq!(random, json!(true));
    assert_eq!(bridge.notifications().sink().shown.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn populated_notifications_use_overrides() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    let shown = bridge
        .invoke(
            None,
            "show-populated-notification",
            json!({ "category": "welcome", "overrides": { "firstName": "Ada" } }),
        )
        .await
        .unwrap();
    assert_eq!(shown, json!(true));

    let shown = bridge.notifications().sink().shown.lock().unwrap().clone();
    let (title, body) = &shown[0];
    assert!(title.contains("Ada"), "{title}");
    assert!(!title.contains('{') && !body.contains('{'), "{title} / {body}");
}

#[tokio::test]
async fn unsupported_notifications_return_false() {
    let dir = TempDir::new().unwrap();
    let store = UserStore::load(dir.path().join(USER_DATA_FILE), "1.0.0").await;
    let bridge = Bridge::new(
        FakeHost::default(),
        MemoryCookieJar::default(),
        RecordingSink::new(false),
        store,
    );

    let shown = bridge
        .invoke(None, "show-notification", json!({ "title": "Hi", "body": "There" }))
        .await
        .unwrap();
    assert_eq!(shown, json!(false));
}

#[tokio::test]
async fn user_channels_round_trip_through_the_store() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    bridge
        .invoke(None, "update-user-activity", json!({ "kind": "commits", "value": 3 }))
        .await
        .unwrap();
    let activity = bridge
        .invoke(None, "update-user-activity", json!({ "kind": "commits", "value": 2 }))
        .await
        .unwrap();
    assert_eq!(activity["commitsToday"], json!(5));

    let profile = bridge
        .invoke(
            None,
            "update-user-profile",
            json!({ "profile": { "firstName": "Ada", "team": "core" } }),
        )
        .await
        .unwrap();
    assert_eq!(profile["firstName"], json!("Ada"));
    assert_eq!(profile["team"], json!("core"));

    let data = bridge.invoke(None, "get-user-data", Value::Null).await.unwrap();
    assert_eq!(data["profile"]["firstName"], json!("Ada"));
    assert_eq!(data["activity"]["commitsToday"], json!(5));
    assert_eq!(data["app"]["version"], json!("1.0.0"));
}

#[tokio::test]
async fn bad_payloads_are_rejected() {
    let dir = TempDir::new().unwrap();
    let bridge = bridge_with(FakeHost::default(), &dir).await;

    let err = bridge
        .invoke(None, "update-user-activity", json!({ "kind": "coffee", "value": 1 }))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::InvalidPayload {
            channel: "update-user-activity",
            ..
        }
    ));

    let err = bridge
        .invoke(None, "update-user-profile", json!({ "profile": { "firstName": 7 } }))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Store(_)));
}
