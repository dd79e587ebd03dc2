//! Link Statistics Service
//!
//! Accumulates per-link traffic volumes and travel times across repeated
//! simulation iterations, bucketed by hour of day, and exports running
//! averages as a flat CSV table:
//! - running minimum and running sum per (link, hour) bucket
//! - volume-weighted travel-time accumulation
//! - a trailing daily-total bucket per link

pub mod config;
pub mod export;
pub mod sources;
pub mod store;

use parking_lot::RwLock;
use services_common::constants::SECS_PER_HOUR_F64;
use services_common::{LinkId, Network, StatsError};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub use config::LinkStatsConfig;
pub use export::{CSV_HEADER, average_travel_time};
pub use sources::{
    FreeFlowTravelTimes, IndexedObservations, IterationObservations, LinkSeries, TravelTimeSource,
    VolumeSource,
};
pub use store::{LinkRecord, LinkStatsStore, StatTable};

/// Aggregates link observations across iterations.
///
/// `reset` and `add_data` serialize behind a write lock: the compare-then-
/// store minimum fold and the iteration counter are multi-step updates and
/// must never interleave. Export takes the read lock and never mutates the
/// store.
#[derive(Debug)]
pub struct LinkStats {
    network: Arc<Network>,
    store: RwLock<LinkStatsStore>,
    hours: usize,
}

impl LinkStats {
    /// Create a service for a fixed network.
    ///
    /// The store starts uninitialized; call [`LinkStats::reset`] before the
    /// first [`LinkStats::add_data`].
    pub fn new(network: Arc<Network>, config: &LinkStatsConfig) -> Result<Self, StatsError> {
        let hours = config.tracked_hours()?;
        Ok(Self {
            network,
            store: RwLock::new(LinkStatsStore::new(hours)),
            hours,
        })
    }

    /// Number of tracked hourly buckets
    #[must_use]
    pub fn hours(&self) -> usize {
        self.hours
    }

    /// Iterations aggregated since the last reset
    #[must_use]
    pub fn count(&self) -> u32 {
        self.store.read().count()
    }

    /// Snapshot of one link's record
    #[must_use]
    pub fn record(&self, link: LinkId) -> Option<LinkRecord> {
        self.store.read().record(link).cloned()
    }

    /// Drop all records and rebuild an all-zero record for every link
    /// currently in the network.
    pub fn reset(&self) {
        let mut store = self.store.write();
        store.reset(&self.network);
        info!(links = store.len(), hours = self.hours, "link statistics reset");
    }

    /// Fold one iteration's observations into every tracked link.
    ///
    /// Every observation is materialized before any record is touched, so a
    /// missing source entry aborts the call without a half-folded
    /// iteration. The iteration counter moves by exactly one per successful
    /// call, independent of the link count.
    pub fn add_data(
        &self,
        volumes: &dyn VolumeSource,
        travel_times: &dyn TravelTimeSource,
    ) -> Result<(), StatsError> {
        let mut store = self.store.write();
        if !store.is_initialized() {
            return Err(StatsError::Configuration(
                "add_data called before reset".to_string(),
            ));
        }

        let link_ids = store.link_ids_sorted();
        let mut folds: Vec<(LinkId, &[f64], Vec<f64>)> = Vec::with_capacity(link_ids.len());
        for link_id in link_ids {
            let link = self.network.link(link_id).ok_or_else(|| {
                StatsError::Configuration(format!(
                    "tracked link {link_id} is no longer part of the network"
                ))
            })?;
            let hourly = volumes
                .hourly_volumes(link_id)
                .ok_or(StatsError::MissingObservation {
                    kind: "volume",
                    link: link_id,
                })?;
            if hourly.len() != self.hours {
                return Err(StatsError::Configuration(format!(
                    "volume series for link {link_id} has {} entries, expected {}",
                    hourly.len(),
                    self.hours
                )));
            }
            let mut times = Vec::with_capacity(self.hours);
            for hour in 0..self.hours {
                let entered_at = hour as f64 * SECS_PER_HOUR_F64;
                let time = travel_times.travel_time(link, entered_at).ok_or(
                    StatsError::MissingObservation {
                        kind: "travel time",
                        link: link_id,
                    },
                )?;
                times.push(time);
            }
            folds.push((link_id, hourly, times));
        }

        for (link_id, hourly, times) in folds {
            if let Some(record) = store.record_mut(link_id) {
                record.fold_iteration(hourly, &times);
            }
        }
        store.bump_count();
        debug!(iteration = store.count(), "aggregated iteration");
        Ok(())
    }

    /// Export the current averages as a CSV table.
    pub fn write_csv(&self, path: &Path) -> Result<(), StatsError> {
        let store = self.store.read();
        export::write_csv(&self.network, &store, path)
    }
}
