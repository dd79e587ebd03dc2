//! Observation source contracts and file-backed implementations

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use services_common::constants::SECS_PER_HOUR_F64;
use services_common::{Link, LinkId, StatsError};
use std::fs;
use std::path::Path;

/// Hourly traffic volumes of the current iteration, per link
pub trait VolumeSource {
    /// The hourly volume sequence observed on a link, or `None` when the
    /// source has no entry for it.
    fn hourly_volumes(&self, link: LinkId) -> Option<&[f64]>;
}

/// Link travel durations of the current iteration
pub trait TravelTimeSource {
    /// Travel duration in seconds across a link entered at `time_secs`
    /// seconds since midnight, or `None` when the source has no entry for
    /// the link.
    fn travel_time(&self, link: &Link, time_secs: f64) -> Option<f64>;
}

/// Travel-time source answering with each link's free-flow time.
///
/// On a link without recorded traffic this matches what the observed
/// minimum converges to.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeFlowTravelTimes;

impl TravelTimeSource for FreeFlowTravelTimes {
    fn travel_time(&self, link: &Link, _time_secs: f64) -> Option<f64> {
        Some(link.free_flow_time())
    }
}

/// Per-link hourly value sequence as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSeries {
    /// Observed link
    pub link: LinkId,
    /// One value per tracked hour
    pub hourly: Vec<f64>,
}

/// One iteration's observations over the whole network.
///
/// The document is fully materialized before the aggregator reads any hour
/// of it, as the fold contract requires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IterationObservations {
    /// Hourly volumes per link
    pub volumes: Vec<LinkSeries>,
    /// Hourly travel durations per link, in seconds
    pub travel_times: Vec<LinkSeries>,
}

impl IterationObservations {
    /// Load one iteration's observations from a JSON document
    pub fn from_json(path: &Path) -> Result<Self, StatsError> {
        let raw = fs::read_to_string(path).map_err(|source| StatsError::io(path, source))?;
        serde_json::from_str(&raw).map_err(|source| StatsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the observations as a JSON document
    pub fn to_json(&self, path: &Path) -> Result<(), StatsError> {
        let raw = serde_json::to_string_pretty(self).map_err(|source| StatsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw).map_err(|source| StatsError::io(path, source))
    }

    /// Index the series by link for constant-time lookup during a fold
    #[must_use]
    pub fn indexed(&self) -> IndexedObservations<'_> {
        IndexedObservations {
            volumes: self
                .volumes
                .iter()
                .map(|series| (series.link, series.hourly.as_slice()))
                .collect(),
            times: self
                .travel_times
                .iter()
                .map(|series| (series.link, series.hourly.as_slice()))
                .collect(),
        }
    }
}

/// Map-indexed view over one iteration's observations
#[derive(Debug)]
pub struct IndexedObservations<'a> {
    volumes: FxHashMap<LinkId, &'a [f64]>,
    times: FxHashMap<LinkId, &'a [f64]>,
}

impl VolumeSource for IndexedObservations<'_> {
    fn hourly_volumes(&self, link: LinkId) -> Option<&[f64]> {
        self.volumes.get(&link).copied()
    }
}

impl TravelTimeSource for IndexedObservations<'_> {
    fn travel_time(&self, link: &Link, time_secs: f64) -> Option<f64> {
        let series = self.times.get(&link.id)?;
        let hour = (time_secs / SECS_PER_HOUR_F64) as usize;
        series.get(hour).copied()
    }
}
