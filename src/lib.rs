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

//! Asynchronous HPE OneView client.
//!
//! # Usage
//!
//! Start with a [Connection](struct.Connection.html), created from a session ID or loaded with
//! [from_env](fn.from_env.html) or [from_config](fn.from_config.html). Then use the resource
//! wrappers, for example [EthernetNetworks](networking/struct.EthernetNetworks.html):
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), oneview::Error> {
//! let conn = oneview::from_env()?;
//! let networks = conn
//!     .ethernet_networks()
//!     .get_range("TestNetwork", "2, 9-10")
//!     .await?;
//! for net in networks {
//!     println!("{} {:?}", net.name, net.vlan_id);
//! }
//! # Ok(()) }
//! # #[tokio::main]
//! # async fn main() { example().await.unwrap(); }
//! ```
//!
//! # Range selectors
//!
//! Families of resources created in bulk share a name prefix and are told apart by an ordinal
//! (the VLAN ID for Ethernet networks). A selector like `"6-7,9"` picks members of a family by
//! their ordinals, see [parse_selector](fn.parse_selector.html) and
//! [resolve_range](fn.resolve_range.html).

#![crate_name = "oneview"]
#![crate_type = "lib"]
// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
// Taken from https://github.com/rust-unofficial/patterns/
#![deny(
    improper_ctypes,
    missing_debug_implementations,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_import_braces,
    unused_parens,
    while_true
)]
#![warn(missing_docs, unused_results)]
#![allow(
    clippy::new_ret_no_self,
    clippy::should_implement_trait,
    clippy::wrong_self_convention
)]

mod apiversion;
mod auth;
pub mod client;
pub mod common;
mod connection;
mod error;
mod fc_sans;
mod loading;
pub mod networking;
mod query;
mod range;
mod resource;
#[cfg(feature = "stream")]
mod stream;
pub mod task;
mod url;
mod utils;

pub use crate::apiversion::ApiVersion;
pub use crate::auth::{AuthType, NoAuth, SessionToken};
pub use crate::connection::Connection;
pub use crate::error::{Error, ErrorKind};
pub use crate::fc_sans::{ConnectionInfo, FcSans};
pub use crate::loading::{from_config, from_default_config, from_env};
pub use crate::query::{field_filter, prefix_filter, ListQuery, Query, QueryItem};
pub use crate::range::{parse_selector, resolve_range, NamedItem, RangeSelector};
pub use crate::resource::{Reply, ResourceClient, ALL};
pub use crate::task::{Task, TaskMonitor, TaskState};
