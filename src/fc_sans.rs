// Copyright 2026 Dmitry Tantsur <dtantsur@protonmail.com>
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

//! FC SAN device managers, managed SANs and providers.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resource::{Reply, ResourceClient, ALL};
use super::task::Task;
use super::{Connection, Error};

const DEVICE_MANAGERS_URI: &str = "/rest/fc-sans/device-managers";
const MANAGED_SANS_URI: &str = "/rest/fc-sans/managed-sans";
const PROVIDERS_URI: &str = "/rest/fc-sans/providers";

/// A single connection parameter of a device manager (e.g. `Host` or `Password`).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: Value,
    /// Other attributes, e.g. `displayName` or `valueType`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectionInfo {
    /// A new connection parameter.
    pub fn new<N: Into<String>, V: Into<Value>>(name: N, value: V) -> ConnectionInfo {
        ConnectionInfo {
            name: name.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceManagerRequest<'a> {
    connection_info: &'a [ConnectionInfo],
}

/// FC SANs API.
#[derive(Debug, Clone)]
pub struct FcSans {
    device_managers: ResourceClient,
    managed_sans: ResourceClient,
    providers: ResourceClient,
}

impl FcSans {
    /// How long to wait for a device manager removal.
    pub const REMOVE_TIMEOUT: Duration = Duration::from_secs(600);

    /// Create the API wrapper.
    pub fn new(connection: Connection) -> FcSans {
        FcSans {
            device_managers: ResourceClient::new(connection.clone(), DEVICE_MANAGERS_URI),
            managed_sans: ResourceClient::new(connection.clone(), MANAGED_SANS_URI),
            providers: ResourceClient::new(connection, PROVIDERS_URI),
        }
    }

    /// List SAN device managers.
    pub async fn get_device_managers(&self) -> Result<Vec<Value>, Error> {
        self.device_managers.get_all(0, ALL, "", "").await
    }

    /// List managed SANs.
    pub async fn get_managed_sans(&self) -> Result<Vec<Value>, Error> {
        self.managed_sans.get_all(0, ALL, "", "").await
    }

    /// List device manager providers.
    pub async fn get_providers(&self) -> Result<Vec<Value>, Error> {
        self.providers.get_all(0, ALL, "", "").await
    }

    /// Register a device manager with a provider.
    ///
    /// The `provider_uri` is the device managers URI of the provider (its `deviceManagersUri`).
    pub async fn add_device_manager(
        &self,
        provider_uri: &str,
        connection_info: &[ConnectionInfo],
        timeout: Option<Duration>,
    ) -> Result<Value, Error> {
        debug!("Adding a device manager via {}", provider_uri);
        let body = DeviceManagerRequest { connection_info };
        self.providers
            .create(&body, Some(provider_uri), timeout, None)
            .await
    }

    /// Remove a device manager.
    ///
    /// With `blocking` the removal task is awaited (up to [REMOVE_TIMEOUT](#associatedconstant.REMOVE_TIMEOUT)),
    /// otherwise it is returned as it is.
    pub async fn remove_device_manager(
        &self,
        manager_uri: &str,
        blocking: bool,
    ) -> Result<Option<Task>, Error> {
        let uri = self.device_managers.build_uri(manager_uri)?;
        debug!("Removing device manager {}", uri);
        let response = self.device_managers.connection().delete(&uri).await?;
        let text = response.text().await?;
        match Reply::parse(&text)? {
            Reply::Task(task) if blocking => self
                .device_managers
                .connection()
                .tasks()
                .wait_for_task(task, Some(FcSans::REMOVE_TIMEOUT))
                .await
                .map(Some),
            Reply::Task(task) => Ok(Some(task)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{ConnectionInfo, DeviceManagerRequest, FcSans};
    use crate::common::test::compare;
    use crate::{Connection, ErrorKind};

    fn fc_sans() -> FcSans {
        FcSans::new(Connection::new_noauth())
    }

    #[test]
    fn test_uris() {
        let api = fc_sans();
        assert_eq!(api.device_managers.uri(), "/rest/fc-sans/device-managers");
        assert_eq!(api.managed_sans.uri(), "/rest/fc-sans/managed-sans");
        assert_eq!(api.providers.uri(), "/rest/fc-sans/providers");
        assert_eq!(
            api.device_managers.build_uri("5c4e8e8d").unwrap(),
            "/rest/fc-sans/device-managers/5c4e8e8d"
        );
    }

    #[test]
    fn test_connection_info() {
        let info = vec![
            ConnectionInfo::new("Host", "172.18.15.1"),
            ConnectionInfo::new("SnmpPort", 161),
        ];
        compare(
            r#"{
                "connectionInfo": [
                    {"name": "Host", "value": "172.18.15.1"},
                    {"name": "SnmpPort", "value": 161}
                ]
            }"#,
            DeviceManagerRequest {
                connection_info: &info,
            },
        );
    }

    #[test]
    fn test_connection_info_extra() {
        let info: ConnectionInfo = serde_json::from_value(json!({
            "name": "Password",
            "value": "secret",
            "displayName": "Password",
            "valueType": "String"
        }))
        .unwrap();
        assert_eq!(info.name, "Password");
        assert_eq!(info.extra["valueType"], "String");
    }

    #[tokio::test]
    async fn test_remove_foreign_uri() {
        let err = fc_sans()
            .remove_device_manager("/rest/fc-sans/managed-sans/1", true)
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
