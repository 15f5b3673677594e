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

//! Generic client for a collection of resources.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(feature = "stream")]
use futures::Stream;
use log::{debug, trace};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::common::Collection;
use super::query::{field_filter, ListQuery, Query};
use super::task::Task;
use super::{url, utils, Connection, Error, ErrorKind};

/// A `count` value requesting all members of a collection.
pub const ALL: i64 = -1;

/// Reply to a modifying request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// No body in the response.
    Empty,
    /// A finished task.
    Task(Task),
    /// A resource returned directly.
    Resource(Value),
}

impl Reply {
    pub(crate) fn parse(text: &str) -> Result<Reply, Error> {
        if text.trim().is_empty() {
            return Ok(Reply::Empty);
        }

        let value: Value = serde_json::from_str(text)?;
        if Task::is_task(&value) {
            Ok(Reply::Task(serde_json::from_value(value)?))
        } else {
            Ok(Reply::Resource(value))
        }
    }
}

#[async_trait]
pub(crate) trait FetchPage {
    async fn fetch_page<T>(
        &self,
        uri: &str,
        query: Option<&Query<ListQuery>>,
    ) -> Result<Collection<T>, Error>
    where
        T: DeserializeOwned + Send;
}

#[async_trait]
impl FetchPage for Connection {
    async fn fetch_page<T>(
        &self,
        uri: &str,
        query: Option<&Query<ListQuery>>,
    ) -> Result<Collection<T>, Error>
    where
        T: DeserializeOwned + Send,
    {
        match query {
            Some(query) => self.get_json_query(uri, query).await,
            None => self.get_json(uri).await,
        }
    }
}

#[async_trait]
impl<F> FetchPage for &F
where
    F: FetchPage + Sync + ?Sized,
{
    async fn fetch_page<T>(
        &self,
        uri: &str,
        query: Option<&Query<ListQuery>>,
    ) -> Result<Collection<T>, Error>
    where
        T: DeserializeOwned + Send,
    {
        (**self).fetch_page(uri, query).await
    }
}

/// Fetch members starting with `uri`, following `nextPageUri` until `count` members are
/// collected (or all of them if `count` is negative).
pub(crate) async fn collect_pages<F, T>(
    fetcher: &F,
    uri: &str,
    query: Query<ListQuery>,
    count: i64,
) -> Result<Vec<T>, Error>
where
    F: FetchPage + Sync + ?Sized,
    T: DeserializeOwned + Send,
{
    let mut page: Collection<T> = fetcher.fetch_page(uri, Some(&query)).await?;
    let mut current = uri.to_string();
    let mut result = Vec::new();

    loop {
        let next = page.next_page_uri.take();
        result.extend(page.members);

        if count >= 0 && result.len() as i64 >= count {
            result.truncate(count as usize);
            break;
        }

        match next {
            Some(next) if next != current => {
                trace!("Fetching next page {}", next);
                page = fetcher.fetch_page(&next, None).await?;
                current = next;
            }
            _ => break,
        }
    }

    Ok(result)
}

/// Client for a collection of resources (e.g. `/rest/ethernet-networks`).
///
/// Implements the operations common for most resource types. Resource-specific wrappers like
/// [EthernetNetworks](networking/struct.EthernetNetworks.html) delegate to it.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    connection: Connection,
    uri: &'static str,
}

impl ResourceClient {
    /// Create a client for the collection at the given URI.
    pub fn new(connection: Connection, uri: &'static str) -> ResourceClient {
        ResourceClient { connection, uri }
    }

    /// Connection in use.
    #[inline]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// URI of the collection.
    #[inline]
    pub fn uri(&self) -> &'static str {
        self.uri
    }

    /// Build the URI of a resource from its ID or URI.
    ///
    /// Fails with `InvalidInput` if a URI from another collection is provided.
    pub fn build_uri(&self, id_or_uri: &str) -> Result<String, Error> {
        let id_or_uri = id_or_uri.trim();
        if id_or_uri.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Cannot build a URI from an empty ID",
            ));
        }

        if !id_or_uri.contains('/') {
            Ok(url::extend(self.uri, Some(id_or_uri)))
        } else if url::is_member_of(self.uri, id_or_uri) {
            Ok(id_or_uri.to_string())
        } else {
            Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Unrecognized URI {} for collection {}", id_or_uri, self.uri),
            ))
        }
    }

    /// Build the URI of a subresource (e.g. `associatedProfiles`).
    pub fn build_subresource_uri(&self, id_or_uri: &str, subresource: &str) -> Result<String, Error> {
        Ok(url::extend(&self.build_uri(id_or_uri)?, Some(subresource)))
    }

    /// List resources of the collection.
    ///
    /// Use [ALL](constant.ALL.html) as `count` to get all of them. Empty `filter` or `sort`
    /// values are not sent.
    pub async fn get_all<T>(
        &self,
        start: i64,
        count: i64,
        filter: &str,
        sort: &str,
    ) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned + Send,
    {
        debug!(
            "Listing {} (start {}, count {}, filter {:?}, sort {:?})",
            self.uri, start, count, filter, sort
        );
        let query = Query::list(start, count, filter, sort);
        collect_pages(&self.connection, self.uri, query, count).await
    }

    /// Stream all resources of the collection, fetching pages lazily.
    #[cfg(feature = "stream")]
    pub fn stream_all<T>(&self, filter: &str, sort: &str) -> impl Stream<Item = Result<T, Error>>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        let query = Query::list(0, ALL, filter, sort);
        super::stream::paginated(self.connection.clone(), self.uri.to_string(), query)
    }

    /// Get a resource by its ID or URI.
    pub async fn get<T>(&self, id_or_uri: &str) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        let uri = self.build_uri(id_or_uri)?;
        self.connection.get_json(&uri).await
    }

    /// Get a subresource of a resource.
    pub async fn get_subresource<T>(&self, id_or_uri: &str, subresource: &str) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        let uri = self.build_subresource_uri(id_or_uri, subresource)?;
        self.connection.get_json(&uri).await
    }

    /// Get all resources with the field equal to the value.
    ///
    /// For top-level fields the server-side filter is complemented by a case-insensitive
    /// comparison on the client side.
    pub async fn get_by<T>(&self, field: &str, value: &str) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned + Send,
    {
        let filter = field_filter(field, value);
        let found: Vec<Value> = self.get_all(0, ALL, &filter, "").await?;
        filter_by_field(found, field, value)
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Error::from))
            .collect()
    }

    /// Create a resource.
    ///
    /// The `defaults` are merged into the resource for the keys it does not set. If the
    /// appliance starts a task, it is awaited and the created resource is fetched.
    pub async fn create<R, T>(
        &self,
        resource: &R,
        uri: Option<&str>,
        timeout: Option<Duration>,
        defaults: Option<&Value>,
    ) -> Result<T, Error>
    where
        R: Serialize + ?Sized,
        T: DeserializeOwned + Send,
    {
        let body = utils::with_defaults(resource, defaults)?;
        let uri = uri.unwrap_or(self.uri);
        debug!("Creating a resource at {}", uri);
        let response = self.connection.post(uri, &body).await?;
        self.reply_to_resource(self.finish(response, timeout).await?)
            .await
    }

    /// Submit a request body and wait for the resulting task, if any.
    pub async fn create_and_wait<R>(
        &self,
        resource: &R,
        uri: &str,
        timeout: Option<Duration>,
    ) -> Result<Reply, Error>
    where
        R: Serialize + ?Sized,
    {
        let response = self.connection.post(uri, resource).await?;
        self.finish(response, timeout).await
    }

    /// Update a resource.
    ///
    /// The resource must contain its `uri`.
    pub async fn update<R, T>(
        &self,
        resource: &R,
        timeout: Option<Duration>,
        defaults: Option<&Value>,
    ) -> Result<T, Error>
    where
        R: Serialize + ?Sized,
        T: DeserializeOwned + Send,
    {
        let body = utils::with_defaults(resource, defaults)?;
        let uri = body
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidInput,
                    "Resource to update must have a URI",
                )
            })?;
        let uri = self.build_uri(uri)?;
        debug!("Updating resource {}", uri);
        let response = self.connection.put(&uri, &body).await?;
        self.reply_to_resource(self.finish(response, timeout).await?)
            .await
    }

    /// Delete a resource.
    pub async fn delete(
        &self,
        id_or_uri: &str,
        force: bool,
        timeout: Option<Duration>,
    ) -> Result<(), Error> {
        let uri = self.delete_uri(id_or_uri, force)?;
        debug!("Deleting resource {}", uri);
        let response = self.connection.delete(&uri).await?;
        let _ = self.finish(response, timeout).await?;
        Ok(())
    }

    fn delete_uri(&self, id_or_uri: &str, force: bool) -> Result<String, Error> {
        let mut uri = self.build_uri(id_or_uri)?;
        if force {
            uri.push_str("?force=True");
        }
        Ok(uri)
    }

    async fn finish(&self, response: Response, timeout: Option<Duration>) -> Result<Reply, Error> {
        let text = response.text().await?;
        match Reply::parse(&text)? {
            Reply::Task(task) => Ok(Reply::Task(
                self.connection.tasks().wait_for_task(task, timeout).await?,
            )),
            other => Ok(other),
        }
    }

    async fn reply_to_resource<T>(&self, reply: Reply) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        match reply {
            Reply::Task(task) => self.connection.tasks().get_associated_resource(&task).await,
            Reply::Resource(value) => serde_json::from_value(value).map_err(Error::from),
            Reply::Empty => Err(Error::new(
                ErrorKind::InvalidResponse,
                "Expected a resource or a task in the response, got nothing",
            )),
        }
    }
}

fn filter_by_field(items: Vec<Value>, field: &str, value: &str) -> Vec<Value> {
    if field.contains('.') {
        return items;
    }

    let expected = value.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            let actual = match item.get(field) {
                Some(Value::String(s)) => s.to_lowercase(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string().to_lowercase(),
            };
            actual == expected
        })
        .collect()
}
