//! In-memory traffic network model
//!
//! The network is built elsewhere and is read-only here: link membership and
//! attributes stay fixed for the lifetime of one aggregation session.

use crate::errors::StatsError;
use crate::types::{LinkId, NodeId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A directed network link with static physical attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Link identifier
    pub id: LinkId,
    /// Upstream node
    pub from: NodeId,
    /// Downstream node
    pub to: NodeId,
    /// Length in meters
    pub length: f64,
    /// Free-flow speed in meters per second
    pub freespeed: f64,
    /// Hourly flow capacity in vehicles
    pub capacity: f64,
}

impl Link {
    /// Travel time across the link at free-flow speed, in seconds
    #[must_use]
    pub fn free_flow_time(&self) -> f64 {
        self.length / self.freespeed
    }
}

/// The link set of a fixed network, keyed by link id
#[derive(Debug, Clone, Default)]
pub struct Network {
    links: FxHashMap<LinkId, Link>,
}

impl Network {
    /// Create an empty network
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link, replacing any previous link with the same id
    pub fn insert_link(&mut self, link: Link) {
        self.links.insert(link.id, link);
    }

    /// Look up a link by id
    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// Iterate over all links, in no particular order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// All link ids in ascending order, for deterministic traversal
    #[must_use]
    pub fn link_ids_sorted(&self) -> Vec<LinkId> {
        let mut ids: Vec<LinkId> = self.links.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of links
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the network has no links
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Load a network from a JSON document
    pub fn from_json(path: &Path) -> Result<Self, StatsError> {
        let raw = fs::read_to_string(path).map_err(|source| StatsError::io(path, source))?;
        let file: NetworkFile = serde_json::from_str(&raw).map_err(|source| StatsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let mut network = Self::new();
        for link in file.links {
            network.insert_link(link);
        }
        debug!(links = network.len(), path = %path.display(), "loaded network document");
        Ok(network)
    }

    /// Write the network as a JSON document, links sorted by id
    pub fn to_json(&self, path: &Path) -> Result<(), StatsError> {
        let links: Vec<Link> = self
            .link_ids_sorted()
            .into_iter()
            .filter_map(|id| self.links.get(&id).cloned())
            .collect();
        let file = NetworkFile { links };
        let raw = serde_json::to_string_pretty(&file).map_err(|source| StatsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw).map_err(|source| StatsError::io(path, source))
    }
}

/// On-disk network document
#[derive(Debug, Serialize, Deserialize)]
struct NetworkFile {
    links: Vec<Link>,
}
