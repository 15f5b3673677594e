// Copyright 2018-2020 Dmitry Tantsur <dtantsur@protonmail.com>
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

//! Support for `ONEVIEW_` environment variables.

use std::env;

use super::{Credentials, OneViewConfig};
use crate::{Connection, Error, ErrorKind};

// This is only used for unit testing.
trait Environment {
    fn get(&self, name: &'static str) -> Result<String, Error>;
}

#[derive(Debug, Clone, Copy)]
struct RealEnvironment;

impl Environment for RealEnvironment {
    fn get(&self, name: &'static str) -> Result<String, Error> {
        env::var(name).map_err(|_| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Required environment variable {} is not provided", name),
            )
        })
    }
}

fn config_from_env<E: Environment>(env: E) -> Result<OneViewConfig, Error> {
    let ip = env.get("ONEVIEW_IP")?;
    let api_version = match env.get("ONEVIEW_API_VERSION") {
        Ok(value) => Some(value.parse().map_err(|e: Error| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Invalid ONEVIEW_API_VERSION: {}", e),
            )
        })?),
        Err(_) => None,
    };

    let credentials = Credentials {
        user_name: env.get("ONEVIEW_USERNAME").ok(),
        password: env.get("ONEVIEW_PASSWORD").ok(),
        auth_login_domain: env.get("ONEVIEW_AUTH_LOGIN_DOMAIN").ok(),
        session_id: env.get("ONEVIEW_SESSIONID").ok(),
    };

    Ok(OneViewConfig {
        ip: Some(ip),
        endpoint: None,
        api_version,
        ssl_certificate: env.get("ONEVIEW_SSL_CERTIFICATE").ok(),
        proxy: env.get("ONEVIEW_PROXY").ok(),
        credentials: Some(credentials),
    })
}

/// Create a `Connection` from environment variables.
///
/// `ONEVIEW_IP` is required. `ONEVIEW_SESSIONID`, `ONEVIEW_API_VERSION` (300 by default),
/// `ONEVIEW_SSL_CERTIFICATE` and `ONEVIEW_PROXY` are optional.
pub fn from_env() -> Result<Connection, Error> {
    config_from_env(RealEnvironment)?.create_connection()
}

#[cfg(test)]
pub mod test {
    use std::collections::HashMap;

    use maplit::hashmap;

    use super::{config_from_env, Environment};
    use crate::{ApiVersion, Error, ErrorKind};

    impl Environment for HashMap<&'static str, &'static str> {
        fn get(&self, name: &'static str) -> Result<String, Error> {
            self.get(name)
                .cloned()
                .map(From::from)
                .ok_or_else(|| Error::new(ErrorKind::InvalidConfig, name))
        }
    }

    #[test]
    fn test_ip_only() {
        let env = hashmap! {
            "ONEVIEW_IP" => "172.16.102.59",
        };

        let config = config_from_env(env).unwrap();
        assert_eq!(config.ip.as_deref(), Some("172.16.102.59"));
        assert!(config.api_version.is_none());

        let conn = config.create_connection().unwrap();
        assert_eq!(conn.api_version(), ApiVersion(300));
    }

    #[test]
    fn test_session_and_version() {
        let env = hashmap! {
            "ONEVIEW_IP" => "172.16.102.59",
            "ONEVIEW_SESSIONID" => "123",
            "ONEVIEW_API_VERSION" => "800",
        };

        let config = config_from_env(env).unwrap();
        assert_eq!(config.api_version, Some(ApiVersion(800)));
        assert_eq!(
            config.credentials.as_ref().unwrap().session_id.as_deref(),
            Some("123")
        );

        let conn = config.create_connection().unwrap();
        assert_eq!(conn.api_version(), ApiVersion(800));
        assert_eq!(conn.endpoint().as_str(), "https://172.16.102.59/");
    }

    #[test]
    fn test_missing_ip() {
        let env = hashmap! {
            "ONEVIEW_SESSIONID" => "123",
        };

        let err = config_from_env(env).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_invalid_api_version() {
        let env = hashmap! {
            "ONEVIEW_IP" => "172.16.102.59",
            "ONEVIEW_API_VERSION" => "latest",
        };

        let err = config_from_env(env).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_password_rejected() {
        let env = hashmap! {
            "ONEVIEW_IP" => "172.16.102.59",
            "ONEVIEW_USERNAME" => "administrator",
            "ONEVIEW_PASSWORD" => "secret123",
        };

        let err = config_from_env(env)
            .unwrap()
            .create_connection()
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
