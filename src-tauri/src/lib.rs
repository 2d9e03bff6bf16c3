mod app;
mod commands;
mod config;
mod cookies;
mod host;
mod lifecycle;
mod notification;

use anyhow::Context;
use shell_bridge::Bridge;
use tauri::{AppHandle, Manager};
use tracing_subscriber::EnvFilter;
use user_store::{USER_DATA_FILE, UserStore};

use app::AppBridge;
use config::AppConfig;
use cookies::TauriCookieJar;
use host::TauriHost;
use notification::TauriSink;

/// Load persisted user state and wire the bridge to the running app.
async fn init_bridge(
    app: AppHandle,
    config: AppConfig,
    version: &str,
) -> Result<AppBridge, anyhow::Error> {
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;
    let store = UserStore::load(config.data_dir.join(USER_DATA_FILE), version).await;

    Ok(Bridge::new(
        TauriHost::new(app.clone(), config),
        TauriCookieJar::new(app.clone()),
        TauriSink::new(app),
        store,
    ))
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    config::load_dotenv();
    let config = AppConfig::from_env();
    let keep_resident = config.keep_resident;
    tracing::info!(
        "Starting PiPilot (remote={}, data_dir={})",
        config.remote_url,
        config.data_dir.display()
    );

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .setup(move |app| {
            let version = app.package_info().version.to_string();
            let bridge =
                tauri::async_runtime::block_on(init_bridge(app.handle().clone(), config, &version))?;
            app.manage(bridge);
            app.state::<AppBridge>().start()?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::bridge_invoke,
            commands::bridge_send,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(move |handle, event| lifecycle::handle_run_event(handle, event, keep_resident));
}
