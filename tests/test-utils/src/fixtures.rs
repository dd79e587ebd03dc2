//! Network fixtures

use services_common::{Link, LinkId, Network, NodeId};
use std::sync::Arc;

/// A single 100 m link from node 1 to node 2 at 10 m/s.
#[must_use]
pub fn one_link_network() -> Arc<Network> {
    let mut network = Network::new();
    network.insert_link(Link {
        id: LinkId::new(1),
        from: NodeId::new(1),
        to: NodeId::new(2),
        length: 100.0,
        freespeed: 10.0,
        capacity: 600.0,
    });
    Arc::new(network)
}

/// Two links sharing node 2: link 1 (100 m, free-flow 10 s) and link 2
/// (150 m, free-flow 15 s).
#[must_use]
pub fn two_link_network() -> Arc<Network> {
    let mut network = Network::new();
    network.insert_link(Link {
        id: LinkId::new(1),
        from: NodeId::new(1),
        to: NodeId::new(2),
        length: 100.0,
        freespeed: 10.0,
        capacity: 600.0,
    });
    network.insert_link(Link {
        id: LinkId::new(2),
        from: NodeId::new(2),
        to: NodeId::new(3),
        length: 150.0,
        freespeed: 10.0,
        capacity: 400.0,
    });
    Arc::new(network)
}
