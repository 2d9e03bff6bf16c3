use notify_catalog::{NotificationSink, SinkError};
use tauri::AppHandle;
use tauri::plugin::PermissionState;
use tauri_plugin_notification::NotificationExt;

/// OS notification center via the notification plugin.
pub struct TauriSink {
    app: AppHandle,
}

impl TauriSink {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl NotificationSink for TauriSink {
    fn is_supported(&self) -> bool {
        match self.app.notification().permission_state() {
            Ok(PermissionState::Granted) => true,
            Ok(_) => {
                tracing::debug!("Notification permission not granted");
                false
            }
            Err(e) => {
                tracing::warn!("Failed to query notification permission: {e}");
                false
            }
        }
    }

    fn display(&self, title: &str, body: &str) -> Result<(), SinkError> {
        self.app
            .notification()
            .builder()
            .title(title)
            .body(body)
            .show()
            .map_err(|e| SinkError::Backend(e.to_string()))
    }
}
