//! The crate-wide error type.
//!
//! Everything that can fail in groqchat fails with [`Error`]: building the
//! client, talking to Groq, touching the conversation log, and reading the
//! console.  The chat session decides which of these end the loop; the type
//! itself carries no policy.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

type Source = Arc<dyn error::Error + Send + Sync>;

/// Failure of a groqchat operation.
#[derive(Clone, Debug)]
pub enum Error {
    /// Groq answered with a status that has no dedicated variant.
    Api {
        /// HTTP status of the response.
        status_code: u16,
        /// The `error.type` field of the response body, when present.
        error_type: Option<String>,
        message: String,
    },

    /// Missing, empty, or rejected API key.
    Authentication { message: String },

    /// The key is valid but may not use the requested resource (403).
    Permission { message: String },

    /// Unknown model or endpoint (404).
    NotFound { message: String },

    /// Too many requests (429).
    RateLimit {
        message: String,
        /// Seconds to wait, from the `retry-after` header.
        retry_after: Option<u64>,
    },

    /// The request body was rejected (400).
    BadRequest {
        message: String,
        /// The offending request field, when Groq names one.
        param: Option<String>,
    },

    /// The request or the service timed out.
    Timeout {
        message: String,
        /// Configured client timeout, in seconds.
        duration: Option<f64>,
    },

    /// The user interrupted the prompt.
    Abort { message: String },

    /// The service could not be reached.
    Connection {
        message: String,
        source: Option<Source>,
    },

    /// Groq failed internally (500).
    InternalServer { message: String },

    /// Groq or a gateway in front of it is overloaded (502 to 504).
    ServiceUnavailable {
        message: String,
        /// Seconds to wait, from the `retry-after` header.
        retry_after: Option<u64>,
    },

    /// A completion arrived without any choice to show.
    EmptyResponse { message: String },

    /// A body or timestamp could not be encoded or decoded.
    Serialization {
        message: String,
        source: Option<Source>,
    },

    /// The conversation log or the console failed.
    Io {
        message: String,
        source: Arc<io::Error>,
    },

    /// The HTTP stack failed outside of connecting.
    HttpClient {
        message: String,
        source: Option<Source>,
    },

    /// The endpoint is not a usable URL.
    Url {
        message: String,
        source: Option<url::ParseError>,
    },

    /// The line editor failed for a reason other than I/O.
    Input { message: String },
}

impl Error {
    pub fn api(status_code: u16, error_type: Option<String>, message: String) -> Self {
        Error::Api {
            status_code,
            error_type,
            message,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Error::Permission {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Error::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    pub fn bad_request(message: impl Into<String>, param: Option<String>) -> Self {
        Error::BadRequest {
            message: message.into(),
            param,
        }
    }

    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    pub fn abort(message: impl Into<String>) -> Self {
        Error::Abort {
            message: message.into(),
        }
    }

    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    pub fn internal_server(message: impl Into<String>) -> Self {
        Error::InternalServer {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Error::ServiceUnavailable {
            message: message.into(),
            retry_after,
        }
    }

    pub fn empty_response(message: impl Into<String>) -> Self {
        Error::EmptyResponse {
            message: message.into(),
        }
    }

    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Error::Input {
            message: message.into(),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::RateLimit { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// True when the user interrupted the prompt.
    pub fn is_abort(&self) -> bool {
        matches!(self, Error::Abort { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// True when Groq answered without any choices.
    pub fn is_empty_response(&self) -> bool {
        matches!(self, Error::EmptyResponse { .. })
    }

    /// True when the log file or the console failed.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    /// True for 500 and 502 to 504.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Error::InternalServer { .. } | Error::ServiceUnavailable { .. }
        )
    }

    /// HTTP status of an [`Error::Api`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Seconds Groq asked us to wait before trying again.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Error::RateLimit { retry_after, .. }
            | Error::ServiceUnavailable { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                status_code,
                error_type: Some(error_type),
                message,
            } => write!(f, "{error_type}: {message} (status {status_code})"),
            Error::Api {
                status_code,
                error_type: None,
                message,
            } => write!(f, "API error: {message} (status {status_code})"),
            Error::Authentication { message } => write!(f, "Authentication error: {message}"),
            Error::Permission { message } => write!(f, "Permission denied: {message}"),
            Error::NotFound { message } => write!(f, "Not found: {message}"),
            Error::RateLimit { message, .. } => write!(f, "Rate limited: {message}"),
            Error::BadRequest {
                message,
                param: Some(param),
            } => write!(f, "Bad request: {message} (field {param})"),
            Error::BadRequest {
                message,
                param: None,
            } => write!(f, "Bad request: {message}"),
            Error::Timeout { message, .. } => write!(f, "Timed out: {message}"),
            Error::Abort { message } => write!(f, "Aborted: {message}"),
            Error::Connection { message, .. } => write!(f, "Connection failed: {message}"),
            Error::InternalServer { message } => write!(f, "Groq internal error: {message}"),
            Error::ServiceUnavailable { message, .. } => {
                write!(f, "Service unavailable: {message}")
            }
            Error::EmptyResponse { message } => write!(f, "Empty response: {message}"),
            Error::Serialization { message, .. } => write!(f, "Serialization error: {message}"),
            Error::Io { message, .. } => write!(f, "I/O error: {message}"),
            Error::HttpClient { message, .. } => write!(f, "HTTP error: {message}"),
            Error::Url { message, .. } => write!(f, "Invalid URL: {message}"),
            Error::Input { message } => write!(f, "Input error: {message}"),
        }?;
        match self.retry_after() {
            Some(secs) => write!(f, " (retry after {secs}s)"),
            None => Ok(()),
        }
    }
}

fn as_source(source: &Option<Source>) -> Option<&(dyn error::Error + 'static)> {
    source
        .as_deref()
        .map(|e| e as &(dyn error::Error + 'static))
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. }
            | Error::Serialization { source, .. }
            | Error::HttpClient { source, .. } => as_source(source),
            Error::Io { source, .. } => Some(&**source),
            Error::Url { source, .. } => source
                .as_ref()
                .map(|e| e as &(dyn error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(err.to_string(), Some(err))
    }
}

impl From<time::error::Format> for Error {
    fn from(err: time::error::Format) -> Self {
        Error::serialization(format!("timestamp format error: {err}"), Some(Box::new(err)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = Error::rate_limit("slow down", Some(7));
        assert_eq!(err.to_string(), "Rate limited: slow down (retry after 7s)");
        assert_eq!(err.retry_after(), Some(7));

        let err = Error::api(418, Some("teapot".to_string()), "short and stout".to_string());
        assert_eq!(err.to_string(), "teapot: short and stout (status 418)");
        assert_eq!(err.status_code(), Some(418));
        assert_eq!(err.retry_after(), None);

        let err = Error::bad_request("too long", Some("max_tokens".to_string()));
        assert_eq!(err.to_string(), "Bad request: too long (field max_tokens)");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(err.is_io());
        assert!(error::Error::source(&err).is_some());
    }

    #[test]
    fn boxed_sources_are_exposed() {
        let cause = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::connection("dial", Some(Box::new(cause)));
        let source = error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "refused");
        assert!(error::Error::source(&Error::connection("dial", None)).is_none());
    }

    #[test]
    fn predicates() {
        assert!(Error::authentication("no key").is_authentication());
        assert!(Error::empty_response("nothing").is_empty_response());
        assert!(Error::connection("refused", None).is_connection());
        assert!(Error::service_unavailable("busy", None).is_server_error());
        assert!(!Error::abort("ctrl-c").is_server_error());
        assert!(Error::abort("ctrl-c").is_abort());
    }
}
