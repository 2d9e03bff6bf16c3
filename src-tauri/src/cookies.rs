//! Cookie jar of the shared web view session.

use cookie::time::OffsetDateTime;
use shell_bridge::{CookieError, CookieFilter, CookieJar, CookieRecord, SameSite};
use tauri::webview::Cookie;
use tauri::{AppHandle, Manager, WebviewWindow};
use url::Url;

/// [`CookieJar`] over the web view's persistent cookie store.
///
/// All windows share one browsing session, so any open window can serve
/// cookie requests.
pub struct TauriCookieJar {
    app: AppHandle,
}

impl TauriCookieJar {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn webview(&self) -> Result<WebviewWindow, CookieError> {
        self.app
            .get_webview_window("main")
            .or_else(|| self.app.webview_windows().into_values().next())
            .ok_or_else(|| CookieError::Backend("no web view is open".into()))
    }
}

fn backend(e: tauri::Error) -> CookieError {
    CookieError::Backend(e.to_string())
}

impl CookieJar for TauriCookieJar {
    async fn get(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>, CookieError> {
        let compiled = filter.compile()?;
        let webview = self.webview()?;
        let cookies = match filter.url.as_deref() {
            Some(raw) => {
                let url = Url::parse(raw)
                    .map_err(|e| CookieError::InvalidFilter(format!("{raw}: {e}")))?;
                webview.cookies_for_url(url).map_err(backend)?
            }
            None => webview.cookies().map_err(backend)?,
        };

        Ok(cookies
            .iter()
            .map(to_record)
            .filter(|record| compiled.matches(record))
            .collect())
    }

    async fn set(&self, record: CookieRecord) -> Result<(), CookieError> {
        let name = record.name.clone();
        let cookie = to_cookie(record)?;
        self.webview()?.set_cookie(cookie).map_err(backend)?;
        tracing::debug!("Cookie {name} set");
        Ok(())
    }

    async fn remove(&self, url: &str, name: &str) -> Result<(), CookieError> {
        let parsed =
            Url::parse(url).map_err(|e| CookieError::InvalidCookie(format!("{url}: {e}")))?;
        let webview = self.webview()?;
        let matching: Vec<Cookie<'static>> = webview
            .cookies_for_url(parsed)
            .map_err(backend)?
            .into_iter()
            .filter(|c| c.name() == name)
            .collect();

        for cookie in matching {
            webview.delete_cookie(cookie).map_err(backend)?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<(), CookieError> {
        // The web view engine persists its cookie store itself.
        tracing::debug!("Cookie store flush requested");
        Ok(())
    }
}

fn to_record(cookie: &Cookie<'_>) -> CookieRecord {
    CookieRecord {
        url: None,
        name: cookie.name().to_string(),
        value: cookie.value().to_string(),
        domain: cookie.domain().map(str::to_string),
        path: cookie.path().map(str::to_string),
        secure: cookie.secure().unwrap_or(false),
        http_only: cookie.http_only().unwrap_or(false),
        expiration_date: cookie
            .expires_datetime()
            .map(|at| at.unix_timestamp() as f64),
        same_site: cookie.same_site().map(|s| match s {
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::None => SameSite::NoRestriction,
        }),
    }
}

fn to_cookie(record: CookieRecord) -> Result<Cookie<'static>, CookieError> {
    let mut builder = Cookie::build((record.name, record.value))
        .path(record.path.unwrap_or_else(|| "/".into()))
        .secure(record.secure)
        .http_only(record.http_only);

    if let Some(domain) = record.domain {
        builder = builder.domain(domain);
    }
    if let Some(seconds) = record.expiration_date {
        let at = OffsetDateTime::from_unix_timestamp(seconds as i64)
            .map_err(|e| CookieError::InvalidCookie(format!("expirationDate: {e}")))?;
        builder = builder.expires(at);
    }
    builder = match record.same_site {
        Some(SameSite::Strict) => builder.same_site(cookie::SameSite::Strict),
        Some(SameSite::Lax) => builder.same_site(cookie::SameSite::Lax),
        Some(SameSite::NoRestriction) => builder.same_site(cookie::SameSite::None),
        Some(SameSite::Unspecified) | None => builder,
    };
    Ok(builder.build())
}
