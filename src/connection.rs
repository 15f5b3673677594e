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

//! Connection to a OneView appliance.

use std::path::Path;
use std::sync::Arc;

use log::trace;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::client::{AuthenticatedClient, RequestBuilder};
use super::networking::EthernetNetworks;
use super::task::TaskMonitor;
use super::{loading, url, ApiVersion, AuthType, Error, FcSans};

/// A connection to a OneView appliance.
///
/// The connection serves as a wrapper around an [authentication type](trait.AuthType.html),
/// providing convenient methods to make HTTP requests against the appliance with the configured
/// API version.
///
/// # Note
///
/// All clones of one connection share the same authentication.
#[derive(Debug, Clone)]
pub struct Connection {
    client: AuthenticatedClient,
    endpoint: Url,
    api_version: ApiVersion,
}

impl Connection {
    /// Create a new connection with a given authentication plugin.
    ///
    /// The default API version is used, see [with_api_version](#method.with_api_version).
    pub fn new<Auth: AuthType + 'static>(endpoint: Url, auth_type: Auth) -> Connection {
        Connection::new_with_client(Client::new(), endpoint, auth_type)
    }

    /// Create a new connection with a given authentication plugin and an HTTP client.
    pub fn new_with_client<Auth: AuthType + 'static>(
        client: Client,
        endpoint: Url,
        auth_type: Auth,
    ) -> Connection {
        Connection::new_with_authenticated_client(
            AuthenticatedClient::new_internal(client, Arc::new(auth_type)),
            endpoint,
        )
    }

    /// Create a new connection from an existing authenticated client.
    pub fn new_with_authenticated_client(client: AuthenticatedClient, endpoint: Url) -> Connection {
        Connection {
            client,
            endpoint,
            api_version: ApiVersion::default(),
        }
    }

    /// Create a connection from a configuration file.
    ///
    /// See [from_config](fn.from_config.html) for the file format.
    #[inline]
    pub fn from_config<P: AsRef<Path>>(path: P) -> Result<Connection, Error> {
        loading::from_config(path)
    }

    /// Create a connection from `ONEVIEW_*` environment variables.
    #[inline]
    pub fn from_env() -> Result<Connection, Error> {
        loading::from_env()
    }

    /// Appliance endpoint.
    #[inline]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// API version sent with every request.
    #[inline]
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Set the API version to send with every request.
    #[inline]
    pub fn set_api_version<A: Into<ApiVersion>>(&mut self, api_version: A) {
        self.api_version = api_version.into();
    }

    /// Convert this connection into one using the given API version.
    #[inline]
    pub fn with_api_version<A: Into<ApiVersion>>(mut self, api_version: A) -> Connection {
        self.set_api_version(api_version);
        self
    }

    /// Get a reference to the authenticated client.
    #[inline]
    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// Make an HTTP request.
    ///
    /// The `uri` argument is usually an absolute resource URI as returned by the appliance (e.g.
    /// `/rest/ethernet-networks/1234`).
    ///
    /// This is the most generic call to make a request. You may prefer to use more specific
    /// `get_json`, `post`, `put` or `delete` calls instead.
    pub fn request(&self, method: Method, uri: &str) -> Result<RequestBuilder, Error> {
        let url = url::resolve(&self.endpoint, uri)?;
        trace!(
            "Preparing HTTP {} request to {} with API version {}",
            method,
            url,
            self.api_version
        );
        Ok(self.client.request(method, url).api_version(self.api_version))
    }

    /// Fetch a JSON using the GET request.
    pub async fn get_json<T>(&self, uri: &str) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        self.request(Method::GET, uri)?.fetch_json().await
    }

    /// Fetch a JSON using the GET request with a query.
    pub async fn get_json_query<Q, T>(&self, uri: &str, query: &Q) -> Result<T, Error>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned + Send,
    {
        self.request(Method::GET, uri)?.query(query).fetch_json().await
    }

    /// POST a JSON object.
    pub async fn post<T>(&self, uri: &str, body: &T) -> Result<Response, Error>
    where
        T: Serialize + ?Sized,
    {
        self.request(Method::POST, uri)?.json(body).send().await
    }

    /// PUT a JSON object.
    pub async fn put<T>(&self, uri: &str, body: &T) -> Result<Response, Error>
    where
        T: Serialize + ?Sized,
    {
        self.request(Method::PUT, uri)?.json(body).send().await
    }

    /// Issue a DELETE request.
    pub async fn delete(&self, uri: &str) -> Result<Response, Error> {
        self.request(Method::DELETE, uri)?.send().await
    }

    /// Ethernet networks.
    #[inline]
    pub fn ethernet_networks(&self) -> EthernetNetworks {
        EthernetNetworks::new(self.clone())
    }

    /// FC SANs.
    #[inline]
    pub fn fc_sans(&self) -> FcSans {
        FcSans::new(self.clone())
    }

    /// Tasks.
    #[inline]
    pub fn tasks(&self) -> TaskMonitor {
        TaskMonitor::new(self.clone())
    }

    #[cfg(test)]
    pub(crate) fn new_noauth() -> Connection {
        Connection::new_with_authenticated_client(
            AuthenticatedClient::new_noauth(),
            Url::parse("https://oneview.local").unwrap(),
        )
    }
}

#[cfg(test)]
pub mod test {
    use reqwest::{Method, Url};

    use super::Connection;
    use crate::{ApiVersion, ErrorKind, NoAuth};

    #[test]
    fn test_request() {
        let conn = Connection::new_noauth().with_api_version(ApiVersion(800));
        assert_eq!(conn.api_version(), ApiVersion(800));
        let req = conn
            .request(Method::GET, "/rest/ethernet-networks/1234")
            .unwrap()
            .build();
        assert_eq!(
            req.url().as_str(),
            "https://oneview.local/rest/ethernet-networks/1234"
        );
        let hdr = req.headers().get("x-api-version").unwrap();
        assert_eq!(hdr.to_str().unwrap(), "800");
    }

    #[test]
    fn test_default_api_version() {
        let conn = Connection::new(Url::parse("https://10.0.0.1").unwrap(), NoAuth);
        assert_eq!(conn.api_version(), ApiVersion(300));
        assert_eq!(conn.endpoint().host_str(), Some("10.0.0.1"));
    }

    #[test]
    fn test_request_invalid_endpoint() {
        let conn = Connection::new(Url::parse("unix:/run/oneview.sock").unwrap(), NoAuth);
        let err = conn.request(Method::GET, "/rest/version").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
