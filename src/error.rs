//! Error types returned by the client, the query layer and the proxy.

use reqwest::{StatusCode, header::InvalidHeaderValue};

/// Result alias used throughout the SDK.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced to the caller of any Underdog operation.
///
/// Nothing is retried: transport failures and non-2xx responses are returned
/// as-is so the caller can inspect them.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum Error {
    /// Connection failure, timeout or any other transport-level problem.
    #[display("transport error: {_0}")]
    Transport(#[error(source)] reqwest::Error),
    /// The API answered with a non-2xx status.
    #[display("{status}: {body}")]
    Status {
        /// HTTP status returned by the API.
        status: StatusCode,
        /// Raw response body, usually JSON.
        body: String,
    },
    /// A body could not be encoded or a 2xx body could not be decoded.
    #[display("invalid JSON body: {_0}")]
    Decode(#[error(source)] serde_json::Error),
    /// A base URL or proxy origin that does not parse.
    #[display("invalid url: {_0}")]
    Url(#[error(source)] url::ParseError),
    /// An API key that cannot be sent in an `Authorization` header.
    #[display("invalid api key: {_0}")]
    InvalidHeader(#[error(source)] InvalidHeaderValue),
    /// A cached query entry held a value of another type.
    #[display("cached entry for `{resource}` has an unexpected type")]
    CacheType {
        /// Resource name of the offending query key.
        resource: &'static str,
    },
}

impl Error {
    /// Returns the HTTP status for [`Error::Status`], or the status carried by
    /// a transport error when there is one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Returns the response body for [`Error::Status`].
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Parses the response body of [`Error::Status`] as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body().and_then(|body| serde_json::from_str(body).ok())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Url(err)
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(err: InvalidHeaderValue) -> Self {
        Error::InvalidHeader(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_exposes_status_and_body() {
        let err = Error::Status {
            status: StatusCode::NOT_FOUND,
            body: r#"{"message":"project not found"}"#.into(),
        };

        assert!(err.is_status());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            err.json_body().unwrap()["message"],
            serde_json::json!("project not found")
        );
        assert_eq!(
            err.to_string(),
            r#"404 Not Found: {"message":"project not found"}"#
        );
    }

    #[test]
    fn test_non_status_error_has_no_body() {
        let err = Error::CacheType { resource: "nft" };
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert!(err.json_body().is_none());
    }
}
