//! Per-link statistics records
//!
//! One record per network link, holding running MIN and SUM tables bucketed
//! by hour of day. The volume table carries one trailing bucket for the
//! daily total; the travel-time table does not.

use rustc_hash::FxHashMap;
use services_common::{LinkId, Network};

/// Running MIN and SUM rows over a fixed set of buckets
#[derive(Debug, Clone, PartialEq)]
pub struct StatTable {
    min: Vec<f64>,
    sum: Vec<f64>,
}

impl StatTable {
    fn zeroed(buckets: usize) -> Self {
        Self {
            min: vec![0.0; buckets],
            sum: vec![0.0; buckets],
        }
    }

    /// Fold one observation into a bucket.
    ///
    /// An unseeded record takes the observed value as its minimum; a seeded
    /// one compares. `increment` is added to the running sum either way, so
    /// the two rows can track different quantities (raw travel time for the
    /// minimum, volume-weighted travel time for the sum).
    fn fold(&mut self, bucket: usize, observed: f64, increment: f64, seeded: bool) {
        if !seeded || observed < self.min[bucket] {
            self.min[bucket] = observed;
        }
        self.sum[bucket] += increment;
    }

    /// Running minimum of a bucket
    #[must_use]
    pub fn min(&self, bucket: usize) -> f64 {
        self.min[bucket]
    }

    /// Running sum of a bucket
    #[must_use]
    pub fn sum(&self, bucket: usize) -> f64 {
        self.sum[bucket]
    }

    /// Number of buckets
    #[must_use]
    pub fn buckets(&self) -> usize {
        self.min.len()
    }
}

/// Statistics record of a single link
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRecord {
    volumes: StatTable,
    times: StatTable,
    seeded: bool,
}

impl LinkRecord {
    pub(crate) fn zeroed(hours: usize) -> Self {
        Self {
            volumes: StatTable::zeroed(hours + 1),
            times: StatTable::zeroed(hours),
            seeded: false,
        }
    }

    /// Fold one iteration's observations into this record.
    ///
    /// `volumes` and `times` carry one entry per tracked hour. The hourly
    /// volume total is folded into the trailing daily bucket, and the
    /// record counts as seeded afterwards.
    pub(crate) fn fold_iteration(&mut self, volumes: &[f64], times: &[f64]) {
        debug_assert_eq!(volumes.len(), self.times.buckets());
        debug_assert_eq!(times.len(), self.times.buckets());

        let mut daily_total = 0.0;
        for (hour, (&volume, &time)) in volumes.iter().zip(times).enumerate() {
            self.volumes.fold(hour, volume, volume, self.seeded);
            self.times.fold(hour, time, volume * time, self.seeded);
            daily_total += volume;
        }
        let daily_bucket = self.times.buckets();
        self.volumes.fold(daily_bucket, daily_total, daily_total, self.seeded);
        self.seeded = true;
    }

    /// Volume table: one bucket per tracked hour plus the daily total
    #[must_use]
    pub fn volumes(&self) -> &StatTable {
        &self.volumes
    }

    /// Travel-time table: one bucket per tracked hour. The sum row carries
    /// volume-weighted travel time.
    #[must_use]
    pub fn times(&self) -> &StatTable {
        &self.times
    }

    /// Whether this record has absorbed at least one iteration
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}

/// All per-link records of one aggregation session
#[derive(Debug)]
pub struct LinkStatsStore {
    records: FxHashMap<LinkId, LinkRecord>,
    count: u32,
    hours: usize,
    initialized: bool,
}

impl LinkStatsStore {
    pub(crate) fn new(hours: usize) -> Self {
        Self {
            records: FxHashMap::default(),
            count: 0,
            hours,
            initialized: false,
        }
    }

    /// Drop all records and rebuild an all-zero record for every link
    /// currently in the network.
    pub(crate) fn reset(&mut self, network: &Network) {
        self.records.clear();
        for link in network.links() {
            self.records.insert(link.id, LinkRecord::zeroed(self.hours));
        }
        self.count = 0;
        self.initialized = true;
    }

    pub(crate) fn record_mut(&mut self, link: LinkId) -> Option<&mut LinkRecord> {
        self.records.get_mut(&link)
    }

    pub(crate) fn bump_count(&mut self) {
        self.count += 1;
    }

    /// Iterations aggregated since the last reset
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Number of tracked hourly buckets
    #[must_use]
    pub fn hours(&self) -> usize {
        self.hours
    }

    /// Whether `reset` has run at least once
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Record of one link
    #[must_use]
    pub fn record(&self, link: LinkId) -> Option<&LinkRecord> {
        self.records.get(&link)
    }

    /// Number of tracked links
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store tracks no links
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tracked link ids in ascending order
    #[must_use]
    pub fn link_ids_sorted(&self) -> Vec<LinkId> {
        let mut ids: Vec<LinkId> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
