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

#[tokio::main]
async fn main() {
    env_logger::init();
    let filter = env::args().nth(1).unwrap_or_default();

    let conn =
        oneview::from_env().expect("Failed to create a connection from the environment");

    let networks = conn
        .ethernet_networks()
        .get_all(0, oneview::ALL, &filter, "name:ascending")
        .await
        .expect("Failed to list Ethernet networks");
    for net in networks {
        println!(
            "Name = {}, VLAN = {:?}, URI = {}",
            net.name,
            net.vlan_id,
            net.uri.as_deref().unwrap_or("?")
        );
    }
}
