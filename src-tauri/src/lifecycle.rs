//! Application run event handling.

use tauri::{AppHandle, Manager, RunEvent};

use crate::app::AppBridge;

/// Handle application run events.
pub fn handle_run_event(app: &AppHandle, event: RunEvent, keep_resident: bool) {
    match event {
        // Every window is gone; `code` is set only for explicit exits.
        RunEvent::ExitRequested {
            code: None, api, ..
        } => {
            let transitioning = app
                .try_state::<AppBridge>()
                .is_some_and(|bridge| bridge.is_transitioning());
            if transitioning {
                tracing::debug!("Last window closed during stage swap, staying alive");
                api.prevent_exit();
            } else if keep_resident {
                tracing::info!("All windows closed, staying resident");
                api.prevent_exit();
            }
        }
        // Dock click on macOS with no window left.
        #[cfg(target_os = "macos")]
        RunEvent::Reopen {
            has_visible_windows: false,
            ..
        } => {
            if let Some(bridge) = app.try_state::<AppBridge>() {
                bridge.reopen();
            }
        }
        RunEvent::Exit => {
            if let Some(bridge) = app.try_state::<AppBridge>() {
                tauri::async_runtime::block_on(bridge.store().flush());
                tracing::info!("User data flushed, exiting");
            }
        }
        _ => {}
    }
}
