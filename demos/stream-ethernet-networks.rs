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

use futures::pin_mut;
use futures::stream::TryStreamExt;

#[tokio::main]
async fn main() {
    env_logger::init();

    let conn = oneview::from_default_config()
        .or_else(|_| oneview::from_env())
        .expect("Failed to create a connection");

    let networks = conn.ethernet_networks();
    let stream = networks.stream_all("", "vlanId:ascending");
    pin_mut!(stream);
    while let Some(net) = stream
        .try_next()
        .await
        .expect("Failed to fetch the next page")
    {
        println!("VLAN = {:?}, Name = {}", net.vlan_id, net.name);
    }
    println!("Done listing");
}
