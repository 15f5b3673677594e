// Copyright 2019 Dmitry Tantsur <dtantsur@protonmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Base code for authentication.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use static_assertions::{assert_impl_all, assert_obj_safe};

use super::{Error, ErrorKind};

/// Header used by the appliance to carry the session ID.
pub const AUTH_HEADER: &str = "auth";

/// Trait for an authentication type.
///
/// An authentication type is expected to attach whatever credentials the appliance needs to each
/// outgoing request. Acquiring and renewing a session is outside of the scope of this crate.
#[async_trait]
pub trait AuthType: fmt::Debug + Sync + Send {
    /// Authenticate a request.
    async fn authenticate(
        &self,
        client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, Error>;

    /// Refresh the authentication (if supported).
    async fn refresh(&self, client: &Client) -> Result<(), Error>;
}

assert_obj_safe!(AuthType);

/// Authentication type that provides no authentication.
///
/// Only useful for testing and for the few unauthenticated endpoints (like `/rest/version`).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuth;

assert_impl_all!(NoAuth: Send, Sync);

#[async_trait]
impl AuthType for NoAuth {
    /// Authenticate a request.
    async fn authenticate(
        &self,
        _client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, Error> {
        Ok(request)
    }

    /// This call does nothing for `NoAuth`.
    async fn refresh(&self, _client: &Client) -> Result<(), Error> {
        Ok(())
    }
}

/// Authentication with an already issued session ID.
///
/// The session ID is sent in the `Auth` header with every request:
/// ```rust
/// let auth = oneview::SessionToken::new("LTU1NzIzMDMxMjxsYXN0LWxvZ2luLXNlc3Npb24")
///     .expect("Empty session ID");
/// ```
#[derive(Clone)]
pub struct SessionToken {
    session_id: String,
}

assert_impl_all!(SessionToken: Send, Sync);

impl SessionToken {
    /// Create a new authentication from a session ID.
    pub fn new<S: Into<String>>(session_id: S) -> Result<SessionToken, Error> {
        let session_id = session_id.into();
        if session_id.trim().is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Session ID cannot be empty",
            ));
        }

        Ok(SessionToken { session_id })
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("session_id", &"<hidden>")
            .finish()
    }
}

#[async_trait]
impl AuthType for SessionToken {
    /// Authenticate a request.
    async fn authenticate(
        &self,
        _client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, Error> {
        Ok(request.header(AUTH_HEADER, &self.session_id))
    }

    /// Session renewal is not supported, so this call does nothing.
    async fn refresh(&self, _client: &Client) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use reqwest::Client;

    use super::{AuthType, NoAuth, SessionToken};
    use crate::ErrorKind;

    #[test]
    fn test_session_token_empty() {
        let err = SessionToken::new("  ").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_session_token_debug_hides_secret() {
        let auth = SessionToken::new("secret-session").unwrap();
        let repr = format!("{:?}", auth);
        assert!(!repr.contains("secret-session"));
    }

    #[tokio::test]
    async fn test_session_token_authenticate() {
        let client = Client::new();
        let auth = SessionToken::new("abcdef").unwrap();
        let req = auth
            .authenticate(&client, client.get("https://127.0.0.1/rest/version"))
            .await
            .unwrap()
            .build()
            .unwrap();
        let hdr = req.headers().get("auth").unwrap();
        assert_eq!(hdr.to_str().unwrap(), "abcdef");
    }

    #[tokio::test]
    async fn test_noauth_authenticate() {
        let client = Client::new();
        let req = NoAuth
            .authenticate(&client, client.get("https://127.0.0.1/rest/version"))
            .await
            .unwrap()
            .build()
            .unwrap();
        assert!(req.headers().get("auth").is_none());
    }
}
