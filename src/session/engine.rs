//! Resilient request engine
//!
//! Sends one logical request, replaying it while the service answers 429
//! with a `Retry-After` delay, and classifies every other status into either
//! a usable response or a typed error.

use crate::{Error, Result, config::NetworkSettings};
use reqwest::{
    Client, Method, Response, StatusCode,
    cookie::Jar,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER},
};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Vendor status for an exhausted account-level limit ("enhance your calm")
pub const STATUS_ACCOUNT_LIMIT: u16 = 420;

/// Attempts per logical request while rate limited
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// A logical request: method, target, replayable body and headers
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    base_url: String,
    path: String,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
}

impl RequestSpec {
    pub fn new(method: Method, base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::GET, base_url, path)
    }

    pub fn post(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::POST, base_url, path)
    }

    pub fn delete(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, base_url, path)
    }

    /// Merge `headers` into the request headers
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Serialize `body` as the JSON payload
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// URL-encode `fields` as a form payload
    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.body = Some(encoded.into_bytes());
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full target URL
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// HTTP engine shared by the sign-in sequence and the sync operations
#[derive(Debug, Clone)]
pub struct RequestEngine {
    client: Client,
    max_attempts: usize,
}

impl RequestEngine {
    /// Build an engine whose client stores cookies in `jar`
    pub fn new(settings: &NetworkSettings, jar: Arc<Jar>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .cookie_provider(jar)
            .build()?;

        Ok(Self {
            client,
            max_attempts: settings.max_attempts.max(1),
        })
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Execute `spec`, replaying it on 429 after the advertised delay
    ///
    /// 200, 201, 204 and 404 are returned to the caller. Transport errors
    /// propagate immediately; 420 and any other status are terminal.
    pub async fn execute(&self, spec: RequestSpec) -> Result<Response> {
        let url = spec.url();
        let method = spec.method.clone();

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .headers(spec.headers);
        if let Some(body) = spec.body {
            builder = builder.body(body);
        }

        for attempt in 1..=self.max_attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| Error::config(format!("request body for {method} {url} cannot be replayed")))?;

            debug!(attempt, %method, %url, "sending HTTP request");
            let response = request.send().await?;
            let status = response.status();
            debug!(attempt, %method, %url, %status, "received HTTP response");

            match status {
                StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => {
                    return Ok(response);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let delay = retry_after(&response)?;
                    drop(response);
                    if attempt == self.max_attempts {
                        break;
                    }
                    warn!(
                        attempt,
                        %method,
                        %url,
                        "trakt rate limit reached, waiting for {:?} then retrying",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                s if s.as_u16() == STATUS_ACCOUNT_LIMIT => {
                    return Err(Error::AccountLimit {
                        method: method.to_string(),
                        url,
                    });
                }
                s => {
                    return Err(Error::Api {
                        method: method.to_string(),
                        url,
                        status: s.as_u16(),
                        message: format!("unexpected status code {}", s.as_u16()),
                    });
                }
            }
        }

        Err(Error::MaxRetries {
            method: method.to_string(),
            url,
            attempts: self.max_attempts,
        })
    }
}

/// Delay advertised by a 429 response; absent or non-integer values are errors
fn retry_after(response: &Response) -> Result<Duration> {
    let raw = response
        .headers()
        .get(RETRY_AFTER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default();

    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::RetryAfter { value: raw })
}

/// Read the full body and decode it as JSON, naming `operation` on failure
pub async fn decode_json<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| Error::decode(operation, e))
}
