//! Account payloads.

use crate::{SecretString, UserId};
use serde::{Deserialize, Serialize};

/// JSON payload of `GET /securityRealm/user/<id>/api/json`.
///
/// Jenkins omits or nulls fields freely, so everything defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[non_exhaustive]
pub struct UserRecord {
    #[serde(rename = "_class")]
    pub class: Option<String>,
    pub absolute_url: Option<String>,
    pub description: Option<String>,
    pub full_name: String,
    pub id: UserId,
}

/// The caller-facing fields of an account, without a client attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAccount {
    pub username: UserId,
    pub full_name: String,
    /// Jenkins never reports it back, so only set when it was supplied locally.
    pub email: String,
}

impl From<UserRecord> for UserAccount {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.id,
            full_name: record.full_name,
            email: String::new(),
        }
    }
}

/// Input of `UsersService::create`.
///
/// The password is only ever sent in the form body; `Debug` hides it.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: UserId,
    pub password: SecretString,
    pub full_name: String,
    pub email: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        username: impl Into<UserId>,
        password: impl Into<SecretString>,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            full_name: full_name.into(),
            email: email.into(),
        }
    }

    /// What a successful create reports back: the input, minus the password.
    #[must_use]
    pub fn account(&self) -> UserAccount {
        UserAccount {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }

    /// Fields of the `createAccountByAdmin` form, password entered twice.
    pub(crate) fn form_pairs(&self) -> [(&'static str, &str); 5] {
        [
            ("username", self.username.as_str()),
            ("password1", self.password.expose()),
            ("password2", self.password.expose()),
            ("fullname", &self.full_name),
            ("email", &self.email),
        ]
    }
}
