//! Flat-table CSV export of link statistics

use crate::store::{LinkRecord, LinkStatsStore};
use services_common::{Network, StatsError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Column header of the statistics table
pub const CSV_HEADER: &str = "link,from,to,hour,length,freespeed,capacity,stat,volume,traveltime";

const STAT_LABEL: &str = "AVG";

/// Average travel time of one bucket.
///
/// Prefers the volume-weighted average when both of its inputs are
/// meaningful, then the raw weighted sum when it is non-zero, and falls
/// back to the tracked minimum otherwise. On a link nobody traveled the
/// minimum was seeded by the first iteration and equals the free-flow time.
#[must_use]
pub fn average_travel_time(record: &LinkRecord, hour: usize) -> f64 {
    let min_time = record.times().min(hour);
    let sum_volume = record.volumes().sum(hour);
    let weighted_sum = record.times().sum(hour);
    match (sum_volume == 0.0, weighted_sum == 0.0) {
        (true, false) => weighted_sum,
        (false, false) => weighted_sum / sum_volume,
        (_, true) => min_time,
    }
}

/// Write one `AVG` row per (link, hour) pair, links ascending by id.
///
/// The store is read-only here; a failed write removes the partial file and
/// leaves the in-memory statistics untouched, so export can be retried.
pub(crate) fn write_csv(
    network: &Network,
    store: &LinkStatsStore,
    path: &Path,
) -> Result<(), StatsError> {
    if !store.is_initialized() {
        return Err(StatsError::Configuration(
            "statistics export requested before reset".to_string(),
        ));
    }
    if store.count() == 0 {
        return Err(StatsError::NoIterations);
    }

    let result = write_rows(network, store, path);
    if result.is_err() {
        // Do not leave a truncated table behind.
        if fs::remove_file(path).is_err() {
            warn!(path = %path.display(), "could not remove partial statistics file");
        }
    }
    result
}

fn write_rows(network: &Network, store: &LinkStatsStore, path: &Path) -> Result<(), StatsError> {
    let file = File::create(path).map_err(|source| StatsError::io(path, source))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{CSV_HEADER}").map_err(|source| StatsError::io(path, source))?;

    let mut rows = 0_usize;
    for link_id in store.link_ids_sorted() {
        let Some(record) = store.record(link_id) else {
            continue;
        };
        let Some(link) = network.link(link_id) else {
            warn!(link = %link_id, "tracked link missing from network, skipping");
            continue;
        };
        for hour in 0..store.hours() {
            let avg_volume = record.volumes().sum(hour) / f64::from(store.count());
            let avg_time = average_travel_time(record, hour);
            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{}",
                link_id,
                link.from,
                link.to,
                hour,
                link.length,
                link.freespeed,
                link.capacity,
                STAT_LABEL,
                avg_volume,
                avg_time
            )
            .map_err(|source| StatsError::io(path, source))?;
            rows += 1;
        }
    }

    out.flush().map_err(|source| StatsError::io(path, source))?;
    info!(
        path = %path.display(),
        links = store.len(),
        rows,
        iterations = store.count(),
        "wrote link statistics table"
    );
    Ok(())
}
