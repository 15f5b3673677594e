// Copyright 2018 Dmitry Tantsur <dtantsur@protonmail.com>
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

//! ApiVersion implementation.

use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderValue;
use serde::de::{Error as DeserError, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Error, ErrorKind};

/// Name of the header carrying the API version.
pub const API_VERSION_HEADER: &str = "x-api-version";

/// OneView REST API version (e.g. 300 or 800).
///
/// The appliance expects it in the `X-API-Version` header of every request.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ApiVersion(pub u16);

impl ApiVersion {
    /// The version used when nothing else is configured.
    pub const DEFAULT: ApiVersion = ApiVersion(300);
}

impl Default for ApiVersion {
    fn default() -> ApiVersion {
        ApiVersion::DEFAULT
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ApiVersion {
    fn from(value: u16) -> ApiVersion {
        ApiVersion(value)
    }
}

impl From<ApiVersion> for HeaderValue {
    fn from(value: ApiVersion) -> HeaderValue {
        HeaderValue::from(value.0)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<ApiVersion, Error> {
        let version_part = s.trim();
        let version_part = version_part.strip_prefix('v').unwrap_or(version_part);
        version_part.parse().map(ApiVersion).map_err(|_| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid API version: expected a number, got {}", s),
            )
        })
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.0)
    }
}

struct ApiVersionVisitor;

impl<'de> Visitor<'de> for ApiVersionVisitor {
    type Value = ApiVersion;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a string with an integer")
    }

    fn visit_u64<E>(self, value: u64) -> ::std::result::Result<ApiVersion, E>
    where
        E: DeserError,
    {
        u16::try_from(value)
            .map(ApiVersion)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E>(self, value: i64) -> ::std::result::Result<ApiVersion, E>
    where
        E: DeserError,
    {
        u16::try_from(value)
            .map(ApiVersion)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
    }

    fn visit_str<E>(self, value: &str) -> ::std::result::Result<ApiVersion, E>
    where
        E: DeserError,
    {
        ApiVersion::from_str(value).map_err(DeserError::custom)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> ::std::result::Result<ApiVersion, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ApiVersionVisitor)
    }
}
