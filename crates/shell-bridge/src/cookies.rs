//! Cookie records, filters, and the jar abstraction over the web view session.

use std::future::Future;

use serde::{Deserialize, Serialize};
use url::Url;

/// Cookie store error type.
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("Invalid cookie: {0}")]
    InvalidCookie(String),

    #[error("Invalid cookie filter: {0}")]
    InvalidFilter(String),

    #[error("Cookie store error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

/// A cookie as seen by the page.
///
/// `url` is only meaningful when setting a cookie; `expiration_date` is in
/// unix seconds and absent for session cookies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

impl CookieRecord {
    pub fn is_session(&self) -> bool {
        self.expiration_date.is_none()
    }

    /// Check a record destined for `set` and fill in domain and path from
    /// its url.
    pub fn normalized(mut self) -> Result<Self, CookieError> {
        let raw = self
            .url
            .as_deref()
            .ok_or_else(|| CookieError::InvalidCookie("url is required".into()))?;
        let url = Url::parse(raw).map_err(|e| CookieError::InvalidCookie(format!("{raw}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CookieError::InvalidCookie(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| CookieError::InvalidCookie(format!("{raw}: no host")))?
            .to_ascii_lowercase();

        if self.name.is_empty() || self.name.contains([';', '=', ' ']) {
            return Err(CookieError::InvalidCookie(format!("bad name {:?}", self.name)));
        }
        if self.value.contains(';') {
            return Err(CookieError::InvalidCookie("value contains ';'".into()));
        }
        if self.secure && url.scheme() != "https" {
            return Err(CookieError::InvalidCookie(
                "secure cookie requires an https url".into(),
            ));
        }

        let domain = match self.domain.as_deref().map(bare_domain) {
            Some(domain) if domain_matches(&host, &domain) => domain,
            Some(domain) => {
                return Err(CookieError::InvalidCookie(format!(
                    "domain {domain} does not match {host}"
                )));
            }
            None => host,
        };
        self.domain = Some(domain);
        if self.path.as_deref().is_none_or(|p| !p.starts_with('/')) {
            self.path = Some("/".into());
        }
        Ok(self)
    }

    /// Identity of a cookie inside a jar.
    pub fn same_slot(&self, other: &CookieRecord) -> bool {
        self.name == other.name
            && self.domain.as_deref().map(bare_domain) == other.domain.as_deref().map(bare_domain)
            && self.path.as_deref().unwrap_or("/") == other.path.as_deref().unwrap_or("/")
    }
}

/// Structural cookie matcher; unset fields match anything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
}

impl CookieFilter {
    /// Filter selecting the cookies named `name` that would be sent to `url`.
    pub fn for_url_and_name(url: &str, name: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Compile the filter, validating its url.
    pub fn compile(&self) -> Result<CompiledFilter<'_>, CookieError> {
        let url = self
            .url
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|e| CookieError::InvalidFilter(format!("{raw}: {e}"))))
            .transpose()?;
        Ok(CompiledFilter { filter: self, url })
    }
}

/// A [`CookieFilter`] with its url parsed.
pub struct CompiledFilter<'a> {
    filter: &'a CookieFilter,
    url: Option<Url>,
}

impl CompiledFilter<'_> {
    pub fn matches(&self, cookie: &CookieRecord) -> bool {
        let f = self.filter;
        let domain = cookie.domain.as_deref().map(bare_domain).unwrap_or_default();
        let path = cookie.path.as_deref().unwrap_or("/");

        if let Some(url) = &self.url {
            let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
            if !domain_matches(&host, &domain) || !path_matches(url.path(), path) {
                return false;
            }
            if cookie.secure && url.scheme() != "https" {
                return false;
            }
        }
        if f.name.as_deref().is_some_and(|n| n != cookie.name) {
            return false;
        }
        if f
            .domain
            .as_deref()
            .is_some_and(|d| !domain_matches(&domain, &bare_domain(d)))
        {
            return false;
        }
        if f.path.as_deref().is_some_and(|p| p != path) {
            return false;
        }
        if f.secure.is_some_and(|s| s != cookie.secure) {
            return false;
        }
        if f.session.is_some_and(|s| s != cookie.is_session()) {
            return false;
        }
        if f.http_only.is_some_and(|h| h != cookie.http_only) {
            return false;
        }
        true
    }
}

/// Cookie jar of the embedded browsing session.
pub trait CookieJar: Send + Sync {
    /// Cookies matching `filter`; an empty filter returns everything.
    fn get(
        &self,
        filter: &CookieFilter,
    ) -> impl Future<Output = Result<Vec<CookieRecord>, CookieError>> + Send;

    /// Store a cookie, replacing one with the same name, domain and path.
    fn set(&self, record: CookieRecord) -> impl Future<Output = Result<(), CookieError>> + Send;

    /// Remove cookies named `name` for `url`. Missing cookies are not an error.
    fn remove(&self, url: &str, name: &str)
    -> impl Future<Output = Result<(), CookieError>> + Send;

    /// Persist the jar to storage.
    fn flush(&self) -> impl Future<Output = Result<(), CookieError>> + Send;
}

/// Lowercase a cookie domain and strip its leading dot.
pub fn bare_domain(domain: &str) -> String {
    domain.trim_start_matches('.').to_ascii_lowercase()
}

/// RFC 6265 domain-match of `host` against a bare cookie `domain`.
pub fn domain_matches(host: &str, domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
}

/// RFC 6265 path-match of a request path against a cookie path.
pub fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/')
            || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/'))
}
