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

//! Range selectors: human-friendly lists of values and ranges like `"2, 9-10"`.

use std::future::Future;
use std::str::FromStr;

use log::debug;

use super::{Error, ErrorKind};

/// A resource that belongs to a family of resources sharing a name prefix.
///
/// The ordinal identifies the resource inside the family, e.g. the VLAN ID of an Ethernet
/// network created in bulk.
pub trait NamedItem {
    /// Resource name.
    fn name(&self) -> &str;

    /// Ordinal used to match range selectors, if any.
    fn ordinal(&self) -> Option<u32>;
}

/// A parsed range selector.
///
/// The indices keep the order in which they appear in the selector: ranges are expanded from low
/// to high, tokens are concatenated in input order, duplicates are preserved.
///
/// ```rust
/// let selector: oneview::RangeSelector = "2, 9-10".parse().expect("invalid selector");
/// assert_eq!(selector.indices(), &[2, 9, 10]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelector {
    indices: Vec<u32>,
}

fn malformed<S: AsRef<str>>(selector: &str, reason: S) -> Error {
    Error::new(
        ErrorKind::MalformedSelector,
        format!("Invalid range selector {:?}: {}", selector, reason.as_ref()),
    )
}

fn parse_value(selector: &str, value: &str) -> Result<u32, Error> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(
            selector,
            format!("{:?} is not a non-negative integer", value),
        ));
    }

    value
        .parse()
        .map_err(|_| malformed(selector, format!("{} is too large", value)))
}

/// Parse a selector into an ordered list of indices.
///
/// A selector is a comma-separated list of tokens, each token being either a single value
/// (`"9"`) or an inclusive range (`"6-7"`). A single value is never expanded, so `"5"` results
/// in `[5]`.
///
/// Fails with `MalformedSelector` on the first invalid token.
pub fn parse_selector(selector: &str) -> Result<Vec<u32>, Error> {
    if selector.trim().is_empty() {
        return Err(malformed(selector, "selector is empty"));
    }

    let mut result = Vec::new();
    for token in selector.split(',') {
        match token.split_once('-') {
            Some((low, high)) => {
                let low = parse_value(selector, low)?;
                let high = parse_value(selector, high)?;
                if low > high {
                    return Err(malformed(
                        selector,
                        format!("range {}-{} has its bounds reversed", low, high),
                    ));
                }
                result.extend(low..=high);
            }
            None => result.push(parse_value(selector, token)?),
        }
    }

    Ok(result)
}

impl RangeSelector {
    /// Ordered indices of this selector.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of indices (including duplicates).
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the selector has no indices (never true for a parsed selector).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Pick the items matching this selector, in selector order.
    ///
    /// For every index the first item with the same ordinal is taken. Indices without a
    /// matching item are skipped.
    pub fn select<T>(&self, items: &[T]) -> Vec<T>
    where
        T: NamedItem + Clone,
    {
        self.indices
            .iter()
            .filter_map(|idx| {
                items
                    .iter()
                    .find(|item| item.ordinal() == Some(*idx))
                    .cloned()
            })
            .collect()
    }

    /// Indices that have no matching item in the collection.
    pub fn missing<T: NamedItem>(&self, items: &[T]) -> Vec<u32> {
        self.indices
            .iter()
            .copied()
            .filter(|idx| !items.iter().any(|item| item.ordinal() == Some(*idx)))
            .collect()
    }
}

impl FromStr for RangeSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<RangeSelector, Error> {
        Ok(RangeSelector {
            indices: parse_selector(s)?,
        })
    }
}

impl IntoIterator for RangeSelector {
    type Item = u32;
    type IntoIter = ::std::vec::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}

/// Resolve a selector against a family of named resources.
///
/// The `provider` is called exactly once with the name prefix and must return the resources of
/// this family (e.g. by listing with [prefix_filter](fn.prefix_filter.html)). Its errors are
/// returned unchanged. The selector is validated before the provider is called.
///
/// ```rust
/// use oneview::{resolve_range, Error, NamedItem};
///
/// #[derive(Debug, Clone)]
/// struct Network(String, u32);
///
/// impl NamedItem for Network {
///     fn name(&self) -> &str {
///         &self.0
///     }
///
///     fn ordinal(&self) -> Option<u32> {
///         Some(self.1)
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let result = resolve_range("Net", "3, 1", |prefix| {
///     let family: Vec<_> = (1..=3).map(|i| Network(format!("{}_{}", prefix, i), i)).collect();
///     async move { Ok::<_, Error>(family) }
/// })
/// .await
/// .expect("resolving failed");
/// assert_eq!(result[0].name(), "Net_3");
/// assert_eq!(result[1].name(), "Net_1");
/// # }
/// ```
pub async fn resolve_range<T, F, Fut, E>(
    name_prefix: &str,
    selector: &str,
    provider: F,
) -> Result<Vec<T>, E>
where
    T: NamedItem + Clone,
    F: FnOnce(&str) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
    E: From<Error>,
{
    let selector = RangeSelector::from_str(selector)?;
    let items = provider(name_prefix).await?;
    let missing = selector.missing(&items);
    if !missing.is_empty() {
        debug!(
            "No resources with prefix {} found for indices {:?}",
            name_prefix, missing
        );
    }
    Ok(selector.select(&items))
}
