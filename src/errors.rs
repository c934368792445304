use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::HttpResponse;

#[derive(Error, Debug)]
#[error("DNSimple API error: {status} - {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(crate) fn from_response(resp: &HttpResponse) -> Self {
        #[derive(Deserialize)]
        struct ErrorResp {
            message: Option<String>,
            error: Option<String>,
            errors: Option<JsonValue>,
        }

        let status = resp.status;
        let text = resp.body.trim();

        let message = match serde_json::from_str::<ErrorResp>(text) {
            Ok(ErrorResp {
                message: Some(message),
                ..
            })
            | Ok(ErrorResp {
                error: Some(message),
                ..
            }) => message,
            Ok(ErrorResp {
                errors: Some(errors),
                ..
            }) => errors.to_string(),
            _ if text.is_empty() => status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string(),
            _ => text.to_string(),
        };

        Self { status, message }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by the HTTP transport itself, before any status is known.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// An operation was attempted on an entity the client knows to be deleted.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("{kind} {id} has been deleted")]
pub struct ClientStateError {
    pub kind: &'static str,
    pub id: i64,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(ApiError),
    #[error("not found: {0}")]
    NotFound(ApiError),
    #[error("validation failed: {0}")]
    Validation(ApiError),
    #[error(transparent)]
    Api(ApiError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request was cancelled")]
    Cancelled,
    #[error(transparent)]
    ClientState(#[from] ClientStateError),
    #[error("unable to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response is missing the {0:?} envelope")]
    MissingEnvelope(&'static str),
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}

impl ClientError {
    /// Classifies a non-success response by its status.
    pub(crate) fn from_response(resp: &HttpResponse) -> Self {
        let err = ApiError::from_response(resp);
        match resp.status.as_u16() {
            401 | 403 => Self::Auth(err),
            404 => Self::NotFound(err),
            422 => Self::Validation(err),
            _ => Self::Api(err),
        }
    }

    /// Returns the HTTP status, if the error came from a server response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth(err) | Self::NotFound(err) | Self::Validation(err) | Self::Api(err) => {
                Some(err.status())
            }
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientBuilderError {
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("invalid timeout: {0:?}")]
    InvalidTimeout(String),
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
