//! Session layer shared by every Censys API access object.
//!
//! An [`ApiClient`] is bound to one `(endpoint, index)` pair and owns a lazily
//! created HTTP session. Changing the credentials or the timeout invalidates
//! the session; the next call closes it and opens a fresh one.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::types::{Endpoint, HttpMethod, Index};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// The only HTTP status the API uses for a successful response.
pub const SUCCESS_CODE: u16 = 200;

/// A successful response: the status code and the decoded JSON body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    code: u16,
    raw: Value,
}

impl RawResponse {
    pub fn new(code: u16, raw: Value) -> Self {
        Self { code, raw }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// An error response from the API.
///
/// The body is expected to look like `{"error": "...", "error_code": 403}`.
/// When `error_code` disagrees with the transport status the mismatch is
/// logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ErrorResult {
    code: u16,
    raw: Value,
    message: String,
}

impl ErrorResult {
    pub fn new(code: u16, raw: Value) -> Self {
        if let Some(error_code) = raw.get("error_code").and_then(Value::as_u64) {
            if error_code != u64::from(code) {
                warn!(
                    "Response status code ({}) does not match error code in response content ({})",
                    code, error_code
                );
            }
        }

        let message = match raw.get("error") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => raw.to_string(),
        };

        Self { code, raw, message }
    }

    /// Error result for a body that was not JSON at all (e.g. a proxy error page).
    pub fn from_text(code: u16, text: String) -> Self {
        Self {
            code,
            raw: Value::String(text.clone()),
            message: text,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ErrorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}): {}", self.code, self.message)
    }
}

/// Outcome of a single API call.
#[derive(Debug, Clone)]
pub enum ApiResult {
    Success(RawResponse),
    Error(ErrorResult),
}

struct Session {
    http: reqwest::Client,
    api_id: Option<String>,
    api_secret: Option<String>,
}

impl Session {
    fn connect(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_id: config.api_id.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_id {
            Some(ref id) => req.basic_auth(id, self.api_secret.as_deref()),
            None => req,
        }
    }
}

/// Low-level access to one Censys endpoint/index pair.
pub struct ApiClient {
    endpoint: Endpoint,
    index: Index,
    config: ClientConfig,
    session: Option<Session>,
    session_invalid: bool,
}

impl ApiClient {
    pub fn new(endpoint: Endpoint, index: Index, config: ClientConfig) -> Self {
        Self {
            endpoint,
            index,
            config,
            session: None,
            session_invalid: false,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
        self.invalidate_session();
        debug!(
            "Timeout for {}/{} is now {:?}",
            self.endpoint.name(),
            self.index.name(),
            timeout
        );
    }

    pub fn api_id(&self) -> Option<&str> {
        self.config.api_id.as_deref()
    }

    pub fn set_api_id(&mut self, api_id: Option<String>) {
        self.config.api_id = api_id;
        self.invalidate_session();
        debug!(
            "Censys {}/{} now API ID: {:?}",
            self.endpoint.name(),
            self.index.name(),
            self.config.api_id
        );
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.config.api_secret.as_deref()
    }

    pub fn set_api_secret(&mut self, api_secret: Option<String>) {
        self.config.api_secret = api_secret;
        self.invalidate_session();
        debug!(
            "Censys {}/{} API secret has been updated",
            self.endpoint.name(),
            self.index.name()
        );
    }

    /// Whether an HTTP session is currently open.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Release the HTTP session. The next call opens a new one.
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            debug!(
                "Closed session for {}/{}",
                self.endpoint.name(),
                self.index.name()
            );
        }
    }

    /// `{base}/{endpoint}/{index}`
    pub fn make_url(&self) -> String {
        let url = format!(
            "{}/{}/{}",
            self.config.base_url,
            self.endpoint.as_str(),
            self.index.as_str()
        );
        debug!("Created Censys URL: {}", url);
        url
    }

    /// Perform exactly one request against this endpoint/index.
    ///
    /// Returns [`ApiResult::Error`] for any non-200 response; transport
    /// failures (timeouts, refused connections) surface as `Err`.
    pub async fn do_call<B>(
        &mut self,
        method: HttpMethod,
        params: &[(&str, String)],
        data: Option<&B>,
    ) -> Result<ApiResult>
    where
        B: Serialize + ?Sized,
    {
        let url = self.make_url();
        let endpoint = self.endpoint.name();
        let index = self.index.name();

        if tracing::enabled!(tracing::Level::DEBUG) {
            let body = data
                .map(serde_json::to_string)
                .transpose()?
                .unwrap_or_default();
            debug!(
                "Censys {}/{} call: {} {} (params: {:?}, body: {})",
                endpoint, index, method, url, params, body
            );
        }

        let session = self.check_session()?;
        let mut req = match method {
            HttpMethod::Get => session.http.get(&url),
            HttpMethod::Post => session.http.post(&url),
        };
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = data {
            req = req.json(body);
        }

        let response = session.authorize(req).send().await?;
        let code = response.status().as_u16();
        let text = response.text().await?;

        if code == SUCCESS_CODE {
            let raw: Value = serde_json::from_str(&text)?;
            debug!("Censys {}/{} call responded {}", endpoint, index, code);
            return Ok(ApiResult::Success(RawResponse::new(code, raw)));
        }

        warn!("Censys error response ({}): {}", code, text);
        let error = match serde_json::from_str::<Value>(&text) {
            Ok(raw) => ErrorResult::new(code, raw),
            Err(_) => ErrorResult::from_text(code, text),
        };
        Ok(ApiResult::Error(error))
    }

    fn invalidate_session(&mut self) {
        self.session_invalid = true;
    }

    fn check_session(&mut self) -> Result<&Session> {
        if self.session_invalid {
            self.close();
            self.session_invalid = false;
        }
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                debug!(
                    "Opening session for {}/{}",
                    self.endpoint.name(),
                    self.index.name()
                );
                Session::connect(&self.config)?
            }
        };
        Ok(self.session.insert(session))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.endpoint)
            .field("index", &self.index)
            .field("base_url", &self.config.base_url)
            .field("api_id", &self.config.api_id)
            .field("timeout", &self.config.timeout)
            .field("has_session", &self.session.is_some())
            .finish()
    }
}
