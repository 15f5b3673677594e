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

use std::env;

use oneview::NamedItem;

#[tokio::main]
async fn main() {
    env_logger::init();
    let prefix = env::args().nth(1).expect("Expected a name prefix");
    let selector = env::args().nth(2).expect("Expected a range selector, e.g. 2,9-10");

    let conn =
        oneview::from_env().expect("Failed to create a connection from the environment");

    let networks = conn
        .ethernet_networks()
        .get_range(&prefix, &selector)
        .await
        .expect("Failed to resolve the range");
    for net in networks {
        println!("VLAN = {:?}, Name = {}", net.ordinal(), net.name());
    }
}
