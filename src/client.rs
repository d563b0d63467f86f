use std::env;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::connector::CompletionService;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{ChatCompletion, ChatCompletionRequest};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Groq chat completions API.
///
/// Construction never touches the network.
#[derive(Debug, Clone)]
pub struct Groq {
    authorization: HeaderValue,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl Groq {
    /// Create a new Groq client.
    ///
    /// The API key can be provided directly or read from the GROQ_API_KEY
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let authorization = bearer_authorization(api_key, |name| env::var(name).ok())?;
        let base_url = parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            authorization,
            client,
            base_url,
            timeout,
        })
    }

    /// The endpoint requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers
    }

    /// Reads a non-success response into an [`Error`].
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.trim().parse::<u64>().ok());

        match response.text().await {
            Ok(body) => status_error(status_code, retry_after, &body),
            Err(e) => Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            ),
        }
    }

    /// Send a chat completion request and get a non-streaming response.
    pub async fn send(&self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        let url = self.base_url.join("chat/completions")?;
        tracing::debug!(%url, model = %request.model, "sending chat completion");

        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(e.to_string(), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ChatCompletion>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait]
impl CompletionService for Groq {
    async fn create(&self, request: ChatCompletionRequest) -> Result<ChatCompletion> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.send(&request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            tracing::warn!(
                error = %err,
                retry_after = ?err.retry_after(),
                "chat completion failed"
            );
        }
        result
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: Option<String>,
    param: Option<String>,
}

/// Builds the bearer header from `api_key`, or from [`API_KEY_ENV`] via `lookup`.
fn bearer_authorization<F>(api_key: Option<String>, lookup: F) -> Result<HeaderValue>
where
    F: FnOnce(&str) -> Option<String>,
{
    let api_key = api_key.or_else(|| lookup(API_KEY_ENV)).ok_or_else(|| {
        Error::authentication("API key not provided and GROQ_API_KEY environment variable not set")
    })?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(Error::authentication("API key is empty"));
    }
    let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|_| Error::authentication("API key is not a valid header value"))?;
    authorization.set_sensitive(true);
    Ok(authorization)
}

/// Maps an HTTP status and its body onto an [`Error`].
///
/// The message comes from an OpenAI-style `{"error": {...}}` body when the
/// service sends one, and is the raw body otherwise.
fn status_error(status_code: u16, retry_after: Option<u64>, body: &str) -> Error {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error);
    let (message, error_type, param) = match detail {
        Some(ErrorDetail {
            message,
            error_type,
            param,
        }) => (message.unwrap_or_else(|| body.to_string()), error_type, param),
        None => (body.to_string(), None, None),
    };

    match status_code {
        400 => Error::bad_request(message, param),
        401 => Error::authentication(message),
        403 => Error::permission(message),
        404 => Error::not_found(message),
        408 => Error::timeout(message, None),
        429 => Error::rate_limit(message, retry_after),
        500 => Error::internal_server(message),
        502..=504 => Error::service_unavailable(message, retry_after),
        _ => Error::api(status_code, error_type, message),
    }
}

/// Parses an endpoint, ensuring it ends in a slash so relative joins append.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(format!("{base_url} cannot be a base URL"), None));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
