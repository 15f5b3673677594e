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

//! Ethernet networks.

use std::time::Duration;

#[cfg(feature = "stream")]
use futures::Stream;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::common::Bandwidth;
use crate::query::Query;
use crate::range::{parse_selector, resolve_range, NamedItem};
use crate::resource::{collect_pages, FetchPage, ResourceClient, ALL};
use crate::{prefix_filter, ApiVersion, Connection, Error};

const URI: &str = "/rest/ethernet-networks";
const BULK_URI: &str = "/rest/ethernet-networks/bulk";
const BULK_TYPE: &str = "bulk-ethernet-network";
const VLAN_SORT: &str = "vlanId:ascending";

/// An Ethernet network.
///
/// Attributes without a dedicated field are preserved in `extra`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EthernetNetwork {
    /// Network name.
    pub name: String,
    /// VLAN ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u32>,
    /// Network URI, set by the appliance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Purpose, e.g. `General` or `Management`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Whether the link state of uplinks is propagated to the servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_link: Option<bool>,
    /// Whether servers on the network are isolated from each other.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_network: Option<bool>,
    /// `Tagged`, `Untagged` or `Tunnel`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_network_type: Option<String>,
    /// Resource type, filled from the defaults if not set.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    /// Connection template holding the bandwidth settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_template_uri: Option<String>,
    /// Other attributes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EthernetNetwork {
    /// A new network with the given name and VLAN.
    pub fn new<S: Into<String>>(name: S, vlan_id: u32) -> EthernetNetwork {
        EthernetNetwork {
            name: name.into(),
            vlan_id: Some(vlan_id),
            ..EthernetNetwork::default()
        }
    }
}

impl NamedItem for EthernetNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn ordinal(&self) -> Option<u32> {
        self.vlan_id
    }
}

/// A request to create a family of Ethernet networks at once.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkEthernetNetwork {
    /// Selector of VLAN IDs, e.g. `1-10` or `2, 9-10`.
    pub vlan_id_range: String,
    /// Prefix of the names; networks are named `<prefix>_<vlanId>`.
    pub name_prefix: String,
    /// Purpose of all networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Smart link setting of all networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_link: Option<bool>,
    /// Private network setting of all networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_network: Option<bool>,
    /// Bandwidth of all networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,
    /// Resource type, `bulk-ethernet-network`.
    #[serde(rename = "type", default = "bulk_type")]
    pub network_type: String,
}

fn bulk_type() -> String {
    BULK_TYPE.to_string()
}

/// List the family with the given prefix (in VLAN order) and pick the networks from the selector.
async fn list_family<F>(
    fetcher: &F,
    name_prefix: &str,
    selector: &str,
) -> Result<Vec<EthernetNetwork>, Error>
where
    F: FetchPage + Sync + ?Sized,
{
    resolve_range(name_prefix, selector, |prefix| {
        let query = Query::list(0, ALL, prefix_filter(prefix), VLAN_SORT);
        async move { collect_pages(fetcher, URI, query, ALL).await }
    })
    .await
}

impl BulkEthernetNetwork {
    /// A new bulk request.
    pub fn new<P, R>(name_prefix: P, vlan_id_range: R) -> BulkEthernetNetwork
    where
        P: Into<String>,
        R: Into<String>,
    {
        BulkEthernetNetwork {
            vlan_id_range: vlan_id_range.into(),
            name_prefix: name_prefix.into(),
            purpose: None,
            smart_link: None,
            private_network: None,
            bandwidth: None,
            network_type: bulk_type(),
        }
    }
}

/// Ethernet networks API.
#[derive(Debug, Clone)]
pub struct EthernetNetworks {
    client: ResourceClient,
}

impl EthernetNetworks {
    /// Create the API wrapper.
    pub fn new(connection: Connection) -> EthernetNetworks {
        EthernetNetworks {
            client: ResourceClient::new(connection, URI),
        }
    }

    /// Default attributes for the given API version.
    ///
    /// Only versions 200, 300 and 500 have defaults.
    pub fn default_values(api_version: ApiVersion) -> Option<Value> {
        match api_version.0 {
            200 => Some(json!({"type": "ethernet-networkV3"})),
            300 | 500 => Some(json!({"type": "ethernet-networkV300"})),
            _ => None,
        }
    }

    fn defaults(&self) -> Option<Value> {
        EthernetNetworks::default_values(self.client.connection().api_version())
    }

    /// List Ethernet networks.
    pub async fn get_all(
        &self,
        start: i64,
        count: i64,
        filter: &str,
        sort: &str,
    ) -> Result<Vec<EthernetNetwork>, Error> {
        self.client.get_all(start, count, filter, sort).await
    }

    /// Stream all Ethernet networks.
    #[cfg(feature = "stream")]
    pub fn stream_all(
        &self,
        filter: &str,
        sort: &str,
    ) -> impl Stream<Item = Result<EthernetNetwork, Error>> {
        self.client.stream_all(filter, sort)
    }

    /// Get an Ethernet network by its ID or URI.
    pub async fn get(&self, id_or_uri: &str) -> Result<EthernetNetwork, Error> {
        self.client.get(id_or_uri).await
    }

    /// Get Ethernet networks with the field equal to the value.
    pub async fn get_by(&self, field: &str, value: &str) -> Result<Vec<EthernetNetwork>, Error> {
        self.client.get_by(field, value).await
    }

    /// Create an Ethernet network.
    pub async fn create(
        &self,
        resource: &EthernetNetwork,
        timeout: Option<Duration>,
    ) -> Result<EthernetNetwork, Error> {
        let defaults = self.defaults();
        self.client
            .create(resource, None, timeout, defaults.as_ref())
            .await
    }

    /// Create a family of Ethernet networks.
    ///
    /// Returns the networks of the family matching the requested VLAN range.
    pub async fn create_bulk(
        &self,
        resource: &BulkEthernetNetwork,
        timeout: Option<Duration>,
    ) -> Result<Vec<EthernetNetwork>, Error> {
        let _ = parse_selector(&resource.vlan_id_range)?;
        debug!(
            "Creating Ethernet networks {} with VLAN IDs {}",
            resource.name_prefix, resource.vlan_id_range
        );
        let _ = self
            .client
            .create_and_wait(resource, BULK_URI, timeout)
            .await?;
        list_family(
            self.client.connection(),
            &resource.name_prefix,
            &resource.vlan_id_range,
        )
        .await
    }

    /// Get the networks with the given name prefix and VLAN IDs from the selector.
    ///
    /// The result follows the order of the selector. VLAN IDs without a network are skipped.
    pub async fn get_range(
        &self,
        name_prefix: &str,
        selector: &str,
    ) -> Result<Vec<EthernetNetwork>, Error> {
        list_family(self.client.connection(), name_prefix, selector).await
    }

    /// Expand a selector like `6-7,9` into a list of VLAN IDs.
    pub fn dissociate_values_or_ranges(&self, selector: &str) -> Result<Vec<u32>, Error> {
        parse_selector(selector)
    }

    /// Update an Ethernet network.
    ///
    /// The network must have its `uri` set.
    pub async fn update(
        &self,
        resource: &EthernetNetwork,
        timeout: Option<Duration>,
    ) -> Result<EthernetNetwork, Error> {
        let defaults = self.defaults();
        self.client.update(resource, timeout, defaults.as_ref()).await
    }

    /// Delete an Ethernet network.
    pub async fn delete(
        &self,
        id_or_uri: &str,
        force: bool,
        timeout: Option<Duration>,
    ) -> Result<(), Error> {
        if force {
            warn!("Forcibly deleting Ethernet network {}", id_or_uri);
        }
        self.client.delete(id_or_uri, force, timeout).await
    }

    /// URIs of the uplink set groups using the network.
    pub async fn get_associated_uplink_groups(&self, id_or_uri: &str) -> Result<Vec<String>, Error> {
        self.client
            .get_subresource(id_or_uri, "associatedUplinkGroups")
            .await
    }

    /// URIs of the server profiles using the network.
    pub async fn get_associated_profiles(&self, id_or_uri: &str) -> Result<Vec<String>, Error> {
        self.client
            .get_subresource(id_or_uri, "associatedProfiles")
            .await
    }
}
