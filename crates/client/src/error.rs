use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ClientError {
    #[snafu(display("failed to build HTTP client on `{stage}`: {source}"))]
    BuildClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("invalid request URL '{url}' on `{stage}`: {source}"))]
    InvalidUrl {
        stage: &'static str,
        url: String,
        source: url::ParseError,
    },
    #[snafu(display("invalid header name '{name}' on `{stage}`: {source}"))]
    InvalidHeaderName {
        stage: &'static str,
        name: String,
        source: InvalidHeaderName,
    },
    #[snafu(display("invalid value for header '{name}' on `{stage}`: {source}"))]
    InvalidHeaderValue {
        stage: &'static str,
        name: String,
        source: InvalidHeaderValue,
    },
    #[snafu(display("failed to encode request body on `{stage}`: {source}"))]
    EncodeBody {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to decode response body on `{stage}`: {source}"))]
    DecodeBody {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("HTTP {status}: {reason}"))]
    Status {
        stage: &'static str,
        status: u16,
        reason: String,
    },
    #[snafu(display("request timeout: {url}"))]
    Timeout { stage: &'static str, url: String },
    #[snafu(display("HTTP transport failed on `{stage}`: {source}"))]
    Transport {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("interceptor rejected the exchange on `{stage}`: {message}"))]
    Interceptor {
        stage: &'static str,
        message: String,
    },
    #[snafu(display("unexpected payload on `{stage}`: {message}"))]
    UnexpectedPayload {
        stage: &'static str,
        message: String,
    },
}

impl ClientError {
    /// Builds the error interceptors return to abort an exchange.
    pub fn interceptor(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Interceptor {
            stage,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// HTTP status of a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
