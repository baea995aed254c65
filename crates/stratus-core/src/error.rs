//! The error type shared by every Stratus crate.
//!
//! Client failures are classified once, here, so callers can decide between
//! retrying, reporting an upstream outage or rejecting their own input without
//! inspecting HTTP details.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Failure of a Stratus operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input rejected before anything was sent
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Missing or malformed settings
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A base URL or path did not form a valid URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The service could not be reached or reported itself overloaded
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// No answer within the client timeout
    #[error("Timeout waiting for service: {0}")]
    Timeout(String),

    /// Transport failure other than connect or timeout
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// 404 from the service
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400 from the service
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Other 4xx from the service, including authentication failures
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 409 from the service
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Body did not decode into the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Body decoded but lacked a field the next step needs
    #[error("Incomplete response: {0}")]
    IncompleteResponse(String),

    /// A third-party service failed in a way reported verbatim to the user
    #[error("External service error: {service}: {message}")]
    ExternalServiceError {
        /// Name of the failing service
        service: String,
        /// Message for the user
        message: String,
    },

    /// Bug or broken invariant
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for Stratus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// JSON body returned by the HTTP service for a failed request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// What went wrong
    pub error: ErrorDetail,
    /// Correlation ID, when the caller supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Code and message of an [`ErrorResponse`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    /// Stable SCREAMING_CASE code
    pub code: String,
    /// Display text of the error
    pub message: String,
}

impl ErrorResponse {
    /// Attach a correlation ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl Error {
    /// Stable code identifying the variant.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::IncompleteResponse(_) => "INCOMPLETE_RESPONSE",
            Self::ExternalServiceError { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Status an HTTP server answers with when this error reaches its boundary.
    ///
    /// Upstream failures become 502 or 504; problems with the request itself keep
    /// their 4xx class.
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) | Self::BadRequest(_) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::ServiceUnavailable(_)
            | Self::HttpError(_)
            | Self::ParseError(_)
            | Self::IncompleteResponse(_)
            | Self::ExternalServiceError { .. } => StatusCode::BAD_GATEWAY,
            Self::ConfigError(_) | Self::InvalidEndpoint(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Body for an HTTP error response.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
            request_id: None,
        }
    }

    /// Whether sending the same request again may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_)
        )
    }

    /// Whether the error points at a fault on our side and belongs in the error log.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::InternalError(_) | Self::ConfigError(_) | Self::ExternalServiceError { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
