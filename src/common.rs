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

//! Reusable JSON structures.

use serde::de::{DeserializeOwned, Error as DeserError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A page of a collection as returned by listing endpoints.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    /// Members on this page.
    #[serde(default = "Vec::new")]
    pub members: Vec<T>,
    /// URI of the next page, if any.
    #[serde(deserialize_with = "empty_as_default", default)]
    pub next_page_uri: Option<String>,
    /// URI of the previous page, if any.
    #[serde(deserialize_with = "empty_as_default", default)]
    pub prev_page_uri: Option<String>,
    /// Index of the first member on this page.
    #[serde(default)]
    pub start: i64,
    /// Number of members on this page.
    #[serde(default)]
    pub count: i64,
    /// Total number of members in the collection.
    #[serde(default)]
    pub total: i64,
}

impl<T> From<Collection<T>> for Vec<T> {
    fn from(value: Collection<T>) -> Vec<T> {
        value.members
    }
}

/// Bandwidth settings of a network.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bandwidth {
    /// Maximum bandwidth in Mbps.
    pub maximum_bandwidth: u32,
    /// Typical (preferred) bandwidth in Mbps.
    pub typical_bandwidth: u32,
}

/// Deserialize a value where empty string is replaced by `Default` value.
pub fn empty_as_default<'de, D, T>(des: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(des)?;
    match value {
        Value::String(ref s) if s.is_empty() => Ok(T::default()),
        _ => serde_json::from_value(value).map_err(D::Error::custom),
    }
}

#[cfg(test)]
pub mod test {
    use serde::{Deserialize, Serialize};

    use super::{empty_as_default, Bandwidth, Collection};

    pub fn compare<T: Serialize>(sample: &str, value: T) {
        let converted: serde_json::Value = serde_json::from_str(sample).unwrap();
        let result = serde_json::to_value(value).unwrap();
        assert_eq!(result, converted);
    }

    #[derive(Debug, Deserialize)]
    struct Custom(bool);

    #[derive(Debug, Deserialize)]
    struct EmptyAsDefault {
        #[serde(deserialize_with = "empty_as_default")]
        number: u8,
        #[serde(deserialize_with = "empty_as_default")]
        vec: Vec<String>,
        #[serde(deserialize_with = "empty_as_default")]
        opt: Option<Custom>,
        #[serde(deserialize_with = "empty_as_default")]
        string: Option<String>,
    }

    #[test]
    fn test_empty_as_default_with_values() {
        let s = "{\"number\": 42, \"vec\": [\"value\"], \"opt\": true, \"string\": \"value\"}";
        let r: EmptyAsDefault = serde_json::from_str(s).unwrap();
        assert_eq!(r.number, 42);
        assert_eq!(r.vec, vec!["value".to_string()]);
        assert!(r.opt.unwrap().0);
        assert_eq!(r.string.unwrap(), "value");
    }

    #[test]
    fn test_empty_as_default_with_empty_string() {
        let s = "{\"number\": \"\", \"vec\": \"\", \"opt\": \"\", \"string\": \"\"}";
        let r: EmptyAsDefault = serde_json::from_str(s).unwrap();
        assert_eq!(r.number, 0);
        assert!(r.vec.is_empty());
        assert!(r.opt.is_none());
        assert!(r.string.is_none());
    }

    const PAGE: &str = r#"{
    "type": "NetworkCollectionV300",
    "uri": "/rest/ethernet-networks?start=0&count=2",
    "category": "ethernet-networks",
    "start": 0,
    "count": 2,
    "total": 3,
    "prevPageUri": null,
    "nextPageUri": "/rest/ethernet-networks?start=2&count=2",
    "members": [
        {"name": "TestNetwork_1", "vlanId": 1},
        {"name": "TestNetwork_2", "vlanId": 2}
    ]
}"#;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Member {
        name: String,
        vlan_id: u32,
    }

    #[test]
    fn test_collection_parse() {
        let page: Collection<Member> = serde_json::from_str(PAGE).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.count, 2);
        assert!(page.prev_page_uri.is_none());
        assert_eq!(
            page.next_page_uri.as_deref(),
            Some("/rest/ethernet-networks?start=2&count=2")
        );
        let members: Vec<Member> = page.into();
        assert_eq!(members[1].name, "TestNetwork_2");
        assert_eq!(members[1].vlan_id, 2);
    }

    #[test]
    fn test_collection_last_page() {
        let page: Collection<Member> =
            serde_json::from_str(r#"{"members": [], "nextPageUri": ""}"#).unwrap();
        assert!(page.members.is_empty());
        assert!(page.next_page_uri.is_none());
    }

    #[test]
    fn test_bandwidth_serialize() {
        compare(
            r#"{"maximumBandwidth": 10000, "typicalBandwidth": 2000}"#,
            Bandwidth {
                maximum_bandwidth: 10000,
                typical_bandwidth: 2000,
            },
        );
    }
}
