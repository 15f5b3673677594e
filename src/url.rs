// Copyright 2019 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Handy primitives for working with URLs and resource URIs.

use reqwest::Url;

use super::{Error, ErrorKind};

/// Resolve a resource URI (e.g. `/rest/ethernet-networks/1234?force=true`) against the endpoint.
pub fn resolve(endpoint: &Url, uri: &str) -> Result<Url, Error> {
    if endpoint.cannot_be_a_base() || !endpoint.has_host() {
        return Err(Error::new(
            ErrorKind::InvalidConfig,
            format!("Endpoint {} cannot be used as a base URL", endpoint),
        ));
    }

    endpoint.join(uri).map_err(Error::from)
}

/// Append path segments to a resource URI.
pub fn extend<I>(uri: &str, segments: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut result = uri.trim_end_matches('/').to_string();
    for segment in segments {
        result.push('/');
        result.push_str(segment.as_ref().trim_matches('/'));
    }
    result
}

/// Whether the URI points into the given collection.
pub fn is_member_of(collection: &str, uri: &str) -> bool {
    let collection = collection.trim_end_matches('/');
    uri.strip_prefix(collection)
        .map(|rest| rest.starts_with('/') || rest.starts_with('?'))
        .unwrap_or(false)
}
