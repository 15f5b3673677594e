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

//! Internal utilities

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{Error, ErrorKind};

/// Merge default values into a nested JSON object.
///
/// Keys missing from `dest` (or set to `null`) are taken from `defaults`, nested objects are
/// merged recursively. Existing values are never replaced.
pub fn merge_defaults(defaults: Map<String, Value>, dest: &mut Map<String, Value>) {
    for (key, default) in defaults.into_iter() {
        match dest.get_mut(&key) {
            Some(Value::Object(dest_object)) => {
                if let Value::Object(default_object) = default {
                    merge_defaults(default_object, dest_object);
                }
            }
            Some(Value::Null) | None => {
                let _ = dest.insert(key, default);
            }
            Some(dest_value) => {
                if default.is_object() {
                    debug!(
                        "Not merging defaults into {}: expected an object, got {:?}",
                        key, dest_value
                    );
                }
            }
        }
    }
}

/// Serialize a resource and fill in defaults for the missing keys.
pub fn with_defaults<T: Serialize + ?Sized>(
    resource: &T,
    defaults: Option<&Value>,
) -> Result<Value, Error> {
    let mut value = serde_json::to_value(resource)?;
    let object = value.as_object_mut().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidInput,
            "Resources must be serialized into JSON objects",
        )
    })?;

    if let Some(Value::Object(defaults)) = defaults {
        merge_defaults(defaults.clone(), object);
    }

    Ok(value)
}

#[cfg(test)]
pub mod test {
    use serde_json::{json, Value};

    use super::{merge_defaults, with_defaults};
    use crate::ErrorKind;

    fn to_object(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("Unexpected {:?}", other),
        }
    }

    #[test]
    fn test_merge_nested() {
        let defaults = to_object(json!({
            "bandwidth": {"maximumBandwidth": 20000, "typicalBandwidth": 2500},
            "purpose": "General"
        }));
        let mut dest = to_object(json!({
            "bandwidth": {"maximumBandwidth": 10000},
            "name": "net"
        }));

        merge_defaults(defaults, &mut dest);

        assert_eq!(
            Value::Object(dest),
            json!({
                "bandwidth": {"maximumBandwidth": 10000, "typicalBandwidth": 2500},
                "purpose": "General",
                "name": "net"
            })
        );
    }

    #[test]
    fn test_merge_keep_existing() {
        let defaults = to_object(json!({"type": "ethernet-networkV300", "smartLink": true}));
        let mut dest = to_object(json!({"type": "ethernet-networkV3", "smartLink": null}));

        merge_defaults(defaults, &mut dest);

        assert_eq!(
            Value::Object(dest),
            json!({"type": "ethernet-networkV3", "smartLink": true})
        );
    }

    #[test]
    fn test_merge_type_mismatch() {
        let defaults = to_object(json!({"map1": {"map2": {"auth": "password1"}}}));
        let mut dest = to_object(json!({"map1": {"map2": 123}}));
        let expected = dest.clone();

        merge_defaults(defaults, &mut dest);

        assert_eq!(dest, expected);
    }

    #[test]
    fn test_with_defaults() {
        let defaults = json!({"type": "ethernet-networkV300"});
        let value = with_defaults(&json!({"name": "net"}), Some(&defaults)).unwrap();
        assert_eq!(value, json!({"name": "net", "type": "ethernet-networkV300"}));
    }

    #[test]
    fn test_with_defaults_not_an_object() {
        let err = with_defaults(&42, None).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
