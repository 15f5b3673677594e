// Copyright 2020 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Support for loading connections from external input.

#[cfg(any(feature = "native-tls", feature = "rustls"))]
use std::fs;

use log::debug;
#[cfg(any(feature = "native-tls", feature = "rustls"))]
use reqwest::Certificate;
use reqwest::{Client, Proxy, Url};
use serde::Deserialize;

use crate::{ApiVersion, Connection, Error, ErrorKind, NoAuth, SessionToken};

/// Create an HTTP client with the provided CA certificate and proxy.
#[inline]
#[allow(unused_mut)] // mut builder unused with --no-default-features
fn get_client(cacert: Option<String>, proxy: Option<String>) -> Result<Client, Error> {
    let mut builder = Client::builder();
    #[cfg(any(feature = "native-tls", feature = "rustls"))]
    if let Some(cert_path) = cacert {
        let cert_content = fs::read(&cert_path).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot open certificate file {}: {}", cert_path, e),
            )
        })?;

        let cert = Certificate::from_pem(&cert_content).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot parse {} as PEM: {}", cert_path, e),
            )
        })?;

        builder = builder.add_root_certificate(cert);
    }

    #[cfg(not(any(feature = "native-tls", feature = "rustls")))]
    if cacert.is_some() {
        return Err(Error::new(
            ErrorKind::InvalidConfig,
            "TLS support is disabled",
        ));
    }

    if let Some(proxy) = proxy {
        let proxy = Proxy::all(&proxy).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Invalid proxy {}: {}", proxy, e),
            )
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot initialize HTTP backend: {}", e),
        )
    })
}

/// Credentials section of the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub(crate) struct Credentials {
    #[serde(default, rename = "userName")]
    pub(crate) user_name: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
    #[serde(default, rename = "authLoginDomain")]
    pub(crate) auth_login_domain: Option<String>,
    #[serde(default, rename = "sessionID")]
    pub(crate) session_id: Option<String>,
}

/// Connection configuration as read from a file or the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub(crate) struct OneViewConfig {
    #[serde(default)]
    pub(crate) ip: Option<String>,
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    #[serde(default)]
    pub(crate) api_version: Option<ApiVersion>,
    #[serde(default)]
    pub(crate) ssl_certificate: Option<String>,
    #[serde(default)]
    pub(crate) proxy: Option<String>,
    #[serde(default)]
    pub(crate) credentials: Option<Credentials>,
}

#[inline]
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_endpoint(value: &str) -> Result<Url, Error> {
    let value = value.trim();
    let url = if value.contains("://") {
        Url::parse(value)
    } else {
        Url::parse(&format!("https://{}", value))
    };

    url.map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Invalid appliance address {}: {}", value, e),
        )
    })
}

impl OneViewConfig {
    fn endpoint(&self) -> Result<Url, Error> {
        let address = non_empty(self.endpoint.clone())
            .or_else(|| non_empty(self.ip.clone()))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidConfig,
                    "Either an IP address or an endpoint of the appliance is required",
                )
            })?;
        parse_endpoint(&address)
    }

    fn session_id(&self) -> Result<Option<String>, Error> {
        let credentials = match self.credentials {
            Some(ref credentials) => credentials,
            None => return Ok(None),
        };

        match non_empty(credentials.session_id.clone()) {
            Some(session_id) => {
                if let Some(domain) = non_empty(credentials.auth_login_domain.clone()) {
                    debug!("Login domain {} is not used with a session ID", domain);
                }
                if non_empty(credentials.user_name.clone()).is_some() {
                    debug!("Using the session ID, the user name is ignored");
                }
                Ok(Some(session_id))
            }
            None if non_empty(credentials.user_name.clone()).is_some()
                || non_empty(credentials.password.clone()).is_some() =>
            {
                Err(Error::new(
                    ErrorKind::InvalidConfig,
                    "Logging in with a user name and a password is not supported, \
                     provide a session ID instead",
                ))
            }
            None => Ok(None),
        }
    }

    /// Create a connection from this configuration.
    pub(crate) fn create_connection(self) -> Result<Connection, Error> {
        let endpoint = self.endpoint()?;
        let session_id = self.session_id()?;
        let api_version = self.api_version.unwrap_or_default();
        let client = get_client(non_empty(self.ssl_certificate), non_empty(self.proxy))?;

        debug!(
            "Connecting to {} with API version {}",
            endpoint, api_version
        );
        let conn = match session_id {
            Some(session_id) => {
                Connection::new_with_client(client, endpoint, SessionToken::new(session_id)?)
            }
            None => Connection::new_with_client(client, endpoint, NoAuth),
        };
        Ok(conn.with_api_version(api_version))
    }
}

mod config;
mod env;

pub use config::{from_config, from_default_config};
pub use env::from_env;

#[cfg(test)]
mod test {
    use super::{parse_endpoint, Credentials, OneViewConfig};
    use crate::{ApiVersion, ErrorKind};

    #[test]
    fn test_parse_endpoint_ip() {
        let url = parse_endpoint("172.16.102.59").unwrap();
        assert_eq!(url.as_str(), "https://172.16.102.59/");
    }

    #[test]
    fn test_parse_endpoint_url() {
        let url = parse_endpoint(" http://oneview.example.com:8080 ").unwrap();
        assert_eq!(url.as_str(), "http://oneview.example.com:8080/");
    }

    #[test]
    fn test_parse_endpoint_invalid() {
        let err = parse_endpoint("https://").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_create_connection() {
        let config = OneViewConfig {
            ip: Some("172.16.102.59".into()),
            api_version: Some(ApiVersion(500)),
            credentials: Some(Credentials {
                session_id: Some("LTIxNjUzMjc0OTUzzHoF7eEkZLEUWVA-fuOZP4VGA3U8e67E".into()),
                ..Credentials::default()
            }),
            ..OneViewConfig::default()
        };
        let conn = config.create_connection().unwrap();
        assert_eq!(conn.endpoint().as_str(), "https://172.16.102.59/");
        assert_eq!(conn.api_version(), ApiVersion(500));
    }

    #[test]
    fn test_endpoint_preferred_over_ip() {
        let config = OneViewConfig {
            ip: Some("172.16.102.59".into()),
            endpoint: Some("https://oneview.example.com".into()),
            ..OneViewConfig::default()
        };
        let conn = config.create_connection().unwrap();
        assert_eq!(conn.endpoint().host_str(), Some("oneview.example.com"));
        assert_eq!(conn.api_version(), ApiVersion(300));
    }

    #[test]
    fn test_missing_address() {
        let config = OneViewConfig {
            ip: Some("".into()),
            ..OneViewConfig::default()
        };
        let err = config.create_connection().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_password_login_rejected() {
        let config = OneViewConfig {
            ip: Some("172.16.102.59".into()),
            credentials: Some(Credentials {
                user_name: Some("administrator".into()),
                password: Some("secret123".into()),
                ..Credentials::default()
            }),
            ..OneViewConfig::default()
        };
        let err = config.create_connection().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_empty_credentials_ignored() {
        let config = OneViewConfig {
            ip: Some("172.16.102.59".into()),
            credentials: Some(Credentials {
                user_name: Some("".into()),
                password: Some("".into()),
                session_id: Some("".into()),
                ..Credentials::default()
            }),
            ..OneViewConfig::default()
        };
        let _conn = config.create_connection().unwrap();
    }

    #[test]
    fn test_invalid_proxy() {
        let config = OneViewConfig {
            ip: Some("172.16.102.59".into()),
            proxy: Some("http://[invalid".into()),
            ..OneViewConfig::default()
        };
        let err = config.create_connection().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[cfg(any(feature = "native-tls", feature = "rustls"))]
    #[test]
    fn test_missing_certificate() {
        let config = OneViewConfig {
            ip: Some("172.16.102.59".into()),
            ssl_certificate: Some("/nonexistent/oneview.crt".into()),
            ..OneViewConfig::default()
        };
        let err = config.create_connection().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
