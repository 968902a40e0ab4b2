//! Administrator credentials.

use crate::Error;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use std::fmt;

const HIDDEN: &str = "<redacted>";

/// Text that formats as `<redacted>`. Holds API tokens and the passwords
/// of accounts being created.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(Box<str>);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into().into_boxed_str())
    }

    /// The plain text. Only request bodies and headers should see it.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SecretString {
    fn from(secret: &str) -> Self {
        Self(secret.into())
    }
}

impl From<String> for SecretString {
    fn from(secret: String) -> Self {
        Self(secret.into_boxed_str())
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(HIDDEN)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A Jenkins user with one of their API tokens (a password also works),
/// sent as HTTP Basic credentials.
#[derive(Clone)]
pub struct Auth {
    user: String,
    token: SecretString,
}

impl Auth {
    #[must_use]
    pub fn basic(user: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    pub(crate) fn secret(&self) -> &str {
        self.token.expose()
    }

    fn header_value(&self) -> Result<HeaderValue, Error> {
        let encoded = B64.encode(format!("{}:{}", self.user, self.secret()));
        let mut value = HeaderValue::try_from(format!("Basic {encoded}")).map_err(|err| {
            Error::InvalidConfig {
                message: "cannot build the Authorization header".into(),
                source: Some(Box::new(err)),
            }
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        headers.insert(AUTHORIZATION, self.header_value()?);
        Ok(())
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("user", &self.user)
            .field("token", &self.token)
            .finish()
    }
}
