//! Blocking JSON client for the store backend.
//!
//! Every request is resolved against the configured base URL, carries the
//! explicit [`Credentials`] the client was given (if any) as a bearer token,
//! and maps non-success statuses onto [`StoreError`] variants.

use crate::error::{Result, StoreError};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Bearer credential handed to the client at construction or after login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Wraps a blocking `reqwest` client bound to one backend.
pub struct ApiClient {
    base_url: String,
    http: Client,
    credentials: RefCell<Option<Credentials>>,
}

impl ApiClient {
    /// Create a client for `base_url` (no trailing slash).
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: Option<Credentials>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            credentials: RefCell::new(credentials),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the credential used for subsequent requests.
    pub fn set_credentials(&self, credentials: Option<Credentials>) {
        *self.credentials.borrow_mut() = credentials;
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.borrow().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match self.credentials.borrow().as_ref() {
            Some(creds) => req.bearer_auth(creds.token()),
            None => req,
        }
    }

    /// GET `path` with optional query parameters.
    pub fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut req = self.request(Method::GET, path);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.send(req, Method::GET, path)
    }

    pub fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).json(body);
        self.send(req, Method::POST, path)
    }

    pub fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PATCH, path).json(body);
        self.send(req, Method::PATCH, path)
    }

    /// DELETE `path`. An empty response body decodes as `T::default()`.
    pub fn delete<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        let req = self.request(Method::DELETE, path);
        let text = self.send_raw(req, Method::DELETE, path)?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<T> {
        let text = self.send_raw(req, method, path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn send_raw(&self, req: RequestBuilder, method: Method, path: &str) -> Result<String> {
        tracing::debug!(%method, path, "sending request");
        let resp = req.send().map_err(|e| {
            tracing::warn!(%method, path, error = %e, "request failed");
            StoreError::from(e)
        })?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text()?)
        } else {
            let err = error_from_response(resp);
            tracing::warn!(
                %method,
                path,
                status = status.as_u16(),
                error = %err,
                "backend returned an error"
            );
            Err(err)
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.has_credentials())
            .finish()
    }
}

/// Map a non-success response onto an error, preferring the backend's own
/// `message` (or `error`) field over a generic status line.
fn error_from_response(resp: Response) -> StoreError {
    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    let message = extract_message(&body)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    error_for_status(status, message)
}

pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

pub(crate) fn error_for_status(status: StatusCode, message: String) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED => StoreError::Unauthorized(message),
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        StatusCode::CONFLICT => StoreError::Conflict(message),
        _ => StoreError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
