use shell_bridge::Bridge;

use crate::cookies::TauriCookieJar;
use crate::host::TauriHost;
use crate::notification::TauriSink;

/// The bridge as managed by Tauri, shared by every command.
pub type AppBridge = Bridge<TauriHost, TauriCookieJar, TauriSink>;
