//! The two IPC commands the page shim talks to.

use serde_json::Value;
use tauri::{State, WebviewWindow};

use crate::app::AppBridge;

/// Request/response channels. Errors reject the page-side promise.
#[tauri::command]
pub async fn bridge_invoke(
    window: WebviewWindow,
    bridge: State<'_, AppBridge>,
    channel: String,
    payload: Option<Value>,
) -> Result<Value, String> {
    bridge
        .invoke(
            Some(window.label()),
            &channel,
            payload.unwrap_or(Value::Null),
        )
        .await
        .map_err(|e| {
            tracing::debug!("{channel} rejected: {e}");
            e.to_string()
        })
}

/// Fire-and-forget and lifecycle channels. Always resolves.
#[tauri::command]
pub async fn bridge_send(
    window: WebviewWindow,
    bridge: State<'_, AppBridge>,
    channel: String,
    payload: Option<Value>,
) -> Result<(), String> {
    bridge.send(Some(window.label()), &channel, payload.unwrap_or(Value::Null));
    Ok(())
}
