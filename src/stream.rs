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

//! A stream of resources.

use async_stream::try_stream;
use futures::pin_mut;
use futures::stream::{Stream, TryStreamExt};
use log::trace;
use serde::de::DeserializeOwned;

use super::common::Collection;
use super::query::{ListQuery, Query};
use super::resource::FetchPage;
use super::Error;

fn chunks<F, T>(
    fetcher: F,
    uri: String,
    query: Query<ListQuery>,
) -> impl Stream<Item = Result<Vec<T>, Error>>
where
    F: FetchPage,
    T: DeserializeOwned + Send + Unpin,
{
    try_stream! {
        let mut page: Collection<T> = fetcher.fetch_page(&uri, Some(&query)).await?;
        let mut current = uri;
        loop {
            let next = page.next_page_uri.take();
            yield page.members;

            match next {
                Some(next) if next != current => {
                    trace!("Fetching next page {}", next);
                    page = fetcher.fetch_page(&next, None).await?;
                    current = next;
                }
                _ => break,
            }
        }
    }
}

/// Creates a stream of members following `nextPageUri` links.
pub(crate) fn paginated<F, T>(
    fetcher: F,
    uri: String,
    query: Query<ListQuery>,
) -> impl Stream<Item = Result<T, Error>>
where
    F: FetchPage,
    T: DeserializeOwned + Send + Unpin,
{
    try_stream! {
        let iter = chunks(fetcher, uri, query);
        pin_mut!(iter);
        while let Some(chunk) = iter.try_next().await? {
            for item in chunk {
                yield item;
            }
        }
    }
}
