// Copyright 2023 Dmitry Tantsur <dtantsur@protonmail.com>
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

//! Query parameters for listing collections.

use std::borrow::Cow;
use std::ops::{Deref, DerefMut};

use serde::ser::{Error as SerError, SerializeSeq};
use serde::{Serialize, Serializer};

/// An item in a query.
pub trait QueryItem {
    /// Represent the item for serialization into a query.
    ///
    /// The first item of the resulting tuple is a key, the second - its value.
    fn query_item(&self) -> Result<(&str, Cow<str>), crate::Error>;
}

/// A helper for queries.
///
/// The type `T` must implement [QueryItem](trait.QueryItem.html).
///
/// ```rust
/// use oneview::{ListQuery, Query};
///
/// let query = Query::default()
///     .with(ListQuery::Start(0))
///     .with(ListQuery::Count(-1))
///     .with(ListQuery::Sort("vlanId:ascending".into()));
/// let query_string = serde_urlencoded::to_string(query).expect("invalid query");
/// assert_eq!(&query_string, "start=0&count=-1&sort=vlanId%3Aascending");
/// ```
///
/// `Query` helps avoiding creating very large structures when only few query items are
/// normally used.
#[derive(Debug, Clone)]
pub struct Query<T>(pub Vec<T>);

impl<T> Default for Query<T> {
    fn default() -> Query<T> {
        Query(Vec::new())
    }
}

impl<T> Query<T> {
    /// Add a query item.
    #[inline]
    pub fn with(mut self, item: T) -> Self {
        self.0.push(item);
        self
    }
}

impl<T> Deref for Query<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.0
    }
}

impl<T> DerefMut for Query<T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.0
    }
}

impl<T> Serialize for Query<T>
where
    T: QueryItem,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for e in &self.0 {
            let item = e.query_item().map_err(SerError::custom)?;
            seq.serialize_element(&item)?;
        }
        seq.end()
    }
}

/// Query items understood by collection (listing) endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ListQuery {
    /// Index of the first member to return.
    Start(i64),
    /// Number of members to return, `-1` means everything.
    Count(i64),
    /// A filter expression, e.g. `"name='Test'"`.
    Filter(String),
    /// Sort order, e.g. `"name:ascending"`.
    Sort(String),
    /// A general query string.
    Query(String),
    /// A view name to return (resource specific).
    View(String),
    /// Comma-separated names of the fields to return.
    Fields(String),
}

impl QueryItem for ListQuery {
    fn query_item(&self) -> Result<(&str, Cow<str>), crate::Error> {
        Ok(match self {
            ListQuery::Start(v) => ("start", Cow::Owned(v.to_string())),
            ListQuery::Count(v) => ("count", Cow::Owned(v.to_string())),
            ListQuery::Filter(v) => ("filter", Cow::Borrowed(v)),
            ListQuery::Sort(v) => ("sort", Cow::Borrowed(v)),
            ListQuery::Query(v) => ("query", Cow::Borrowed(v)),
            ListQuery::View(v) => ("view", Cow::Borrowed(v)),
            ListQuery::Fields(v) => ("fields", Cow::Borrowed(v)),
        })
    }
}

impl Query<ListQuery> {
    /// Build a typical listing query.
    ///
    /// Empty `filter` and `sort` values are not sent.
    pub fn list<F, S>(start: i64, count: i64, filter: F, sort: S) -> Query<ListQuery>
    where
        F: Into<String>,
        S: Into<String>,
    {
        let mut query = Query::default()
            .with(ListQuery::Start(start))
            .with(ListQuery::Count(count));
        let filter = filter.into();
        if !filter.is_empty() {
            query.push(ListQuery::Filter(filter));
        }
        let sort = sort.into();
        if !sort.is_empty() {
            query.push(ListQuery::Sort(sort));
        }
        query
    }
}

/// A filter matching all resources which names start with `<prefix>_`.
///
/// The underscore is escaped, so that it is not treated as a wildcard.
///
/// ```rust
/// assert_eq!(
///     oneview::prefix_filter("TestNetwork"),
///     "\"'name' matches 'TestNetwork\\_%'\""
/// );
/// ```
pub fn prefix_filter<S: AsRef<str>>(prefix: S) -> String {
    format!("\"'name' matches '{}\\_%'\"", prefix.as_ref())
}

/// A filter matching resources with a field equal to the value.
pub fn field_filter<F: AsRef<str>, V: AsRef<str>>(field: F, value: V) -> String {
    format!("\"'{}'='{}'\"", field.as_ref(), value.as_ref())
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::Error;

    #[derive(Debug)]
    #[allow(dead_code)]
    enum MyQueryItem {
        Foo(String),
        Bar(bool),
        Baz(String),
    }

    impl QueryItem for MyQueryItem {
        fn query_item(&self) -> Result<(&str, Cow<str>), Error> {
            Ok(match self {
                MyQueryItem::Foo(s) => ("foo", Cow::Borrowed(s)),
                MyQueryItem::Bar(b) => ("bar", b.to_string().into()),
                _ => unreachable!(),
            })
        }
    }

    #[test]
    fn test_query() {
        let mut q = Query::default();
        q.push(MyQueryItem::Bar(true));
        q.push(MyQueryItem::Foo("foo1".into()));
        q.push(MyQueryItem::Foo("foo2".into()));
        let s = serde_urlencoded::to_string(q).unwrap();
        assert_eq!(&s, "bar=true&foo=foo1&foo=foo2");
    }

    #[test]
    fn test_query_empty() {
        let q: Query<MyQueryItem> = Query::default();
        let s = serde_urlencoded::to_string(q).unwrap();
        assert_eq!(&s, "");
    }

    #[test]
    fn test_list_query() {
        let q = Query::list(2, 500, "name=TestName", "name:ascending");
        assert_eq!(
            q.0,
            vec![
                ListQuery::Start(2),
                ListQuery::Count(500),
                ListQuery::Filter("name=TestName".into()),
                ListQuery::Sort("name:ascending".into()),
            ]
        );
    }

    #[test]
    fn test_list_query_skips_empty() {
        let q = Query::list(0, -1, "", "");
        let s = serde_urlencoded::to_string(q).unwrap();
        assert_eq!(&s, "start=0&count=-1");
    }

    #[test]
    fn test_prefix_filter() {
        assert_eq!(
            prefix_filter("TestNetwork"),
            "\"'name' matches 'TestNetwork\\_%'\""
        );
    }

    #[test]
    fn test_field_filter() {
        assert_eq!(
            field_filter("name", "OneViewSDK Test Ethernet Network"),
            "\"'name'='OneViewSDK Test Ethernet Network'\""
        );
    }
}
