use crate::{UserAccount, UserId};
use http::{Method, StatusCode};
use std::{error::Error as StdError, fmt};
use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// How much of an unexpected response body to keep on the error.
#[derive(Debug, Clone, Copy)]
pub struct BodySnippetConfig {
    pub enabled: bool,
    pub max_bytes: usize,
}

impl Default for BodySnippetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: 4 * 1024,
        }
    }
}

/// The account call that was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum UserOperation {
    Create,
    Delete,
    Get,
}

impl UserOperation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Get => "get",
        }
    }

    /// `error {verb} user ...`
    fn verb(self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Delete => "deleting",
            Self::Get => "retrieving",
        }
    }
}

impl fmt::Display for UserOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response whose status the caller did not accept.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub method: Method,
    /// Without query, fragment or credentials.
    pub url: Box<Url>,
    pub message: Option<Box<str>>,
    pub request_id: Option<Box<str>>,
    /// Start of the body, secrets replaced by `<redacted>`.
    pub body_snippet: Option<Box<str>>,
}

impl HttpError {
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} ({} {})", self.status, self.method, self.path())?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        match &self.request_id {
            Some(id) => write!(f, " [request-id: {id}]"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    User,
    Api,
    Transport,
    Decode,
    InvalidConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// `create`, `delete` or `get` answered with anything but `200 OK`.
    ///
    /// For `create`, `account` still holds the values that were submitted.
    #[error("error {} user `{username}`: {error}", .operation.verb())]
    User {
        operation: UserOperation,
        username: UserId,
        error: HttpError,
        account: Option<Box<UserAccount>>,
    },

    /// A supporting request (the crumb issuer) was refused.
    #[error("{0}")]
    Api(HttpError),

    /// No HTTP response at all.
    #[error("{method} {path} failed before a response arrived: {source}")]
    Transport {
        method: Method,
        path: Box<str>,
        kind: TransportErrorKind,
        #[source]
        source: BoxError,
    },

    #[error("cannot decode HTTP {status} body of {method} {path}: {source}")]
    Decode {
        status: StatusCode,
        method: Method,
        path: Box<str>,
        request_id: Option<Box<str>>,
        body_snippet: Option<Box<str>>,
        #[source]
        source: BoxError,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfig {
        message: Box<str>,
        #[source]
        source: Option<BoxError>,
    },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::User { .. } => ErrorKind::User,
            Self::Api(_) => ErrorKind::Api,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }

    fn http(&self) -> Option<&HttpError> {
        match self {
            Self::User { error, .. } | Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// Status of the response that caused the error, if one arrived.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Decode { status, .. } => Some(*status),
            other => other.http().map(|http| http.status),
        }
    }

    #[must_use]
    pub fn operation(&self) -> Option<UserOperation> {
        match self {
            Self::User { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// The submitted account of a refused `create`.
    #[must_use]
    pub fn account(&self) -> Option<&UserAccount> {
        match self {
            Self::User { account, .. } => account.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Decode { request_id, .. } => request_id.as_deref(),
            other => other.http()?.request_id.as_deref(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    pub(crate) fn with_account(mut self, submitted: UserAccount) -> Self {
        if let Self::User { account, .. } = &mut self {
            *account = Some(Box::new(submitted));
        }
        self
    }
}
