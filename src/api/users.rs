//! Account administration via `securityRealm`.
//!
//! | Call | Request | Success |
//! |---|---|---|
//! | `create` | `POST /securityRealm/createAccountByAdmin` (form) | `200` |
//! | `delete` | `POST /securityRealm/user/<id>/doDelete` (`Submit=Yes`) | `200` |
//! | `get` | `GET /securityRealm/user/<id>/api/json` | `200` |
//!
//! Any other status, `201` and `302` included, is an [`Error::User`].

use crate::transport::request::Request;
use crate::{Error, NewUser, UserAccount, UserId, UserOperation, UserRecord};
use std::fmt;

fn create_request(new: &NewUser) -> Request {
    Request::post(["securityRealm", "createAccountByAdmin"]).form(new.form_pairs())
}

fn delete_request(id: &UserId) -> Request {
    Request::post(["securityRealm", "user", id.as_str(), "doDelete"]).form([("Submit", "Yes")])
}

fn get_request(id: &UserId) -> Request {
    Request::get(["securityRealm", "user", id.as_str(), "api", "json"])
}

/// Jenkins account administration APIs.
#[derive(Clone)]
#[cfg(feature = "async")]
pub struct UsersService {
    client: crate::Client,
}

#[cfg(feature = "async")]
impl UsersService {
    pub(crate) fn new(client: crate::Client) -> Self {
        Self { client }
    }

    /// Create an account.
    ///
    /// The returned [`User`] echoes `new`; it is not re-read from Jenkins.
    /// Call [`User::refresh`] for the server's view. A refused create still
    /// hands the submitted values back through [`Error::account`].
    pub async fn create(&self, new: &NewUser) -> Result<User, Error> {
        let req = create_request(new);
        self.client
            .send_expect_ok(
                &req,
                UserOperation::Create,
                &new.username,
                &[new.password.expose()],
            )
            .await
            .map_err(|err| err.with_account(new.account()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(user = %new.username, "created Jenkins user");

        Ok(User {
            client: self.client.clone(),
            account: new.account(),
            raw: None,
        })
    }

    /// Delete an account.
    pub async fn delete(&self, username: impl Into<UserId>) -> Result<(), Error> {
        let username = username.into();
        let req = delete_request(&username);
        self.client
            .send_expect_ok(&req, UserOperation::Delete, &username, &[])
            .await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(user = %username, "deleted Jenkins user");

        Ok(())
    }

    /// Fetch an account's profile. `email` is not part of the payload and
    /// stays empty.
    pub async fn get(&self, username: impl Into<UserId>) -> Result<User, Error> {
        let username = username.into();
        let req = get_request(&username);
        let resp = self
            .client
            .send_expect_ok(&req, UserOperation::Get, &username, &[])
            .await?;
        let record: UserRecord = self.client.core().decode(&req, &resp)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(user = %username, "fetched Jenkins user");

        Ok(User {
            client: self.client.clone(),
            account: UserAccount::from(record.clone()),
            raw: Some(record),
        })
    }

    /// A pollable handle on `base_path`, relative to the client base URL.
    #[must_use]
    pub fn resource<T>(&self, base_path: impl Into<String>) -> crate::UserResource<T> {
        crate::UserResource::new(self.client.clone(), base_path)
    }
}

/// A Jenkins account, bound to the client that created or fetched it.
#[cfg(feature = "async")]
#[derive(Clone)]
pub struct User {
    client: crate::Client,
    account: UserAccount,
    raw: Option<UserRecord>,
}

#[cfg(feature = "async")]
impl User {
    #[must_use]
    pub fn account(&self) -> &UserAccount {
        &self.account
    }

    #[must_use]
    pub fn username(&self) -> &UserId {
        &self.account.username
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.account.full_name
    }

    /// Empty unless the account was created through this client.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.account.email
    }

    /// Last profile payload, if this value came from (or was refreshed against) the server.
    #[must_use]
    pub fn raw(&self) -> Option<&UserRecord> {
        self.raw.as_ref()
    }

    #[must_use]
    pub fn client(&self) -> &crate::Client {
        &self.client
    }

    /// Delete this account. Dropping the future abandons the request.
    pub async fn delete(&self) -> Result<(), Error> {
        self.client.users().delete(self.username()).await
    }

    /// Re-read the profile from Jenkins. `email` is kept as is.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let fetched = self.client.users().get(self.username()).await?;
        self.account.username = fetched.account.username;
        self.account.full_name = fetched.account.full_name;
        self.raw = fetched.raw;
        Ok(())
    }
}

#[cfg(feature = "async")]
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("base_url", &self.client.base_url().as_str())
            .field("account", &self.account)
            .field("raw", &self.raw)
            .finish()
    }
}

/// Jenkins account administration APIs (blocking).
#[cfg(feature = "blocking")]
#[derive(Clone)]
pub struct BlockingUsersService {
    client: crate::BlockingClient,
}

#[cfg(feature = "blocking")]
impl BlockingUsersService {
    pub(crate) fn new(client: crate::BlockingClient) -> Self {
        Self { client }
    }

    /// Create an account. See [`UsersService::create`].
    pub fn create(&self, new: &NewUser) -> Result<BlockingUser, Error> {
        let req = create_request(new);
        self.client
            .send_expect_ok(
                &req,
                UserOperation::Create,
                &new.username,
                &[new.password.expose()],
            )
            .map_err(|err| err.with_account(new.account()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(user = %new.username, "created Jenkins user");

        Ok(BlockingUser {
            client: self.client.clone(),
            account: new.account(),
            raw: None,
        })
    }

    pub fn delete(&self, username: impl Into<UserId>) -> Result<(), Error> {
        let username = username.into();
        let req = delete_request(&username);
        self.client
            .send_expect_ok(&req, UserOperation::Delete, &username, &[])?;

        #[cfg(feature = "tracing")]
        tracing::debug!(user = %username, "deleted Jenkins user");

        Ok(())
    }

    pub fn get(&self, username: impl Into<UserId>) -> Result<BlockingUser, Error> {
        let username = username.into();
        let req = get_request(&username);
        let resp = self
            .client
            .send_expect_ok(&req, UserOperation::Get, &username, &[])?;
        let record: UserRecord = self.client.core().decode(&req, &resp)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(user = %username, "fetched Jenkins user");

        Ok(BlockingUser {
            client: self.client.clone(),
            account: UserAccount::from(record.clone()),
            raw: Some(record),
        })
    }

    #[must_use]
    pub fn resource<T>(&self, base_path: impl Into<String>) -> crate::BlockingUserResource<T> {
        crate::BlockingUserResource::new(self.client.clone(), base_path)
    }
}

/// A Jenkins account bound to a [`crate::BlockingClient`].
#[cfg(feature = "blocking")]
#[derive(Clone)]
pub struct BlockingUser {
    client: crate::BlockingClient,
    account: UserAccount,
    raw: Option<UserRecord>,
}

#[cfg(feature = "blocking")]
impl BlockingUser {
    #[must_use]
    pub fn account(&self) -> &UserAccount {
        &self.account
    }

    #[must_use]
    pub fn username(&self) -> &UserId {
        &self.account.username
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.account.full_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.account.email
    }

    #[must_use]
    pub fn raw(&self) -> Option<&UserRecord> {
        self.raw.as_ref()
    }

    #[must_use]
    pub fn client(&self) -> &crate::BlockingClient {
        &self.client
    }

    pub fn delete(&self) -> Result<(), Error> {
        self.client.users().delete(self.username())
    }

    pub fn refresh(&mut self) -> Result<(), Error> {
        let fetched = self.client.users().get(self.username())?;
        self.account.username = fetched.account.username;
        self.account.full_name = fetched.account.full_name;
        self.raw = fetched.raw;
        Ok(())
    }
}

#[cfg(feature = "blocking")]
impl fmt::Debug for BlockingUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingUser")
            .field("base_url", &self.client.base_url().as_str())
            .field("account", &self.account)
            .field("raw", &self.raw)
            .finish()
    }
}
