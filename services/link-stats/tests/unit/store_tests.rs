//! Store-level properties observed through the service API

use anyhow::Result;
use link_stats::{LinkStats, LinkStatsConfig, LinkStatsStore};
use rstest::*;
use services_common::LinkId;
use test_utils::{TableTravelTimes, TableVolumes, two_link_network};

const HOURS: usize = 2;

#[fixture]
fn stats() -> LinkStats {
    let config = LinkStatsConfig {
        max_time_secs: HOURS as u64 * 3600,
    };
    LinkStats::new(two_link_network(), &config).expect("valid config")
}

fn sources(
    a_volumes: &[f64],
    a_times: &[f64],
    b_volumes: &[f64],
    b_times: &[f64],
) -> (TableVolumes, TableTravelTimes) {
    let volumes = TableVolumes::new()
        .with(LinkId::new(1), a_volumes.to_vec())
        .with(LinkId::new(2), b_volumes.to_vec());
    let times = TableTravelTimes::new()
        .with(LinkId::new(1), a_times.to_vec())
        .with(LinkId::new(2), b_times.to_vec());
    (volumes, times)
}

#[rstest]
fn test_first_call_seeds_every_bucket(stats: LinkStats) -> Result<()> {
    stats.reset();
    let (volumes, times) = sources(&[4.0, 7.0], &[10.0, 20.0], &[3.0, 0.0], &[15.0, 5.0]);
    stats.add_data(&volumes, &times)?;

    let record = stats.record(LinkId::new(1)).expect("record");
    for (hour, (&v, &t)) in [4.0, 7.0].iter().zip(&[10.0, 20.0]).enumerate() {
        assert!((record.volumes().min(hour) - v).abs() < f64::EPSILON);
        assert!((record.volumes().sum(hour) - v).abs() < f64::EPSILON);
        assert!((record.times().min(hour) - t).abs() < f64::EPSILON);
        assert!((record.times().sum(hour) - v * t).abs() < f64::EPSILON);
    }
    Ok(())
}

#[rstest]
fn test_running_minimum_is_monotonic(stats: LinkStats) -> Result<()> {
    stats.reset();
    let iterations: [(&[f64], &[f64]); 4] = [
        (&[9.0, 4.0], &[30.0, 12.0]),
        (&[5.0, 6.0], &[10.0, 14.0]),
        (&[7.0, 2.0], &[20.0, 11.0]),
        (&[6.0, 8.0], &[25.0, 16.0]),
    ];

    let mut previous: Option<Vec<(f64, f64)>> = None;
    for (a_volumes, a_times) in iterations {
        let (volumes, times) = sources(a_volumes, a_times, &[0.0, 0.0], &[15.0, 15.0]);
        stats.add_data(&volumes, &times)?;

        let record = stats.record(LinkId::new(1)).expect("record");
        let current: Vec<(f64, f64)> = (0..HOURS)
            .map(|h| (record.volumes().min(h), record.times().min(h)))
            .collect();
        if let Some(previous) = previous {
            for (h, (now, before)) in current.iter().zip(&previous).enumerate() {
                assert!(now.0 <= before.0, "volume minimum grew at hour {h}");
                assert!(now.1 <= before.1, "time minimum grew at hour {h}");
            }
        }
        previous = Some(current);
    }
    Ok(())
}

#[rstest]
fn test_sums_are_order_independent(stats: LinkStats) -> Result<()> {
    let passes: [(&[f64], &[f64]); 3] = [
        (&[4.0, 0.0], &[10.0, 20.0]),
        (&[2.0, 5.0], &[30.0, 20.0]),
        (&[8.0, 1.0], &[12.0, 18.0]),
    ];

    let mut forward_sums = Vec::new();
    let mut reversed_sums = Vec::new();
    for reversed in [false, true] {
        stats.reset();
        let mut order: Vec<_> = passes.to_vec();
        if reversed {
            order.reverse();
        }
        for (a_volumes, a_times) in order {
            let (volumes, times) = sources(a_volumes, a_times, &[1.0, 1.0], &[15.0, 15.0]);
            stats.add_data(&volumes, &times)?;
        }
        let record = stats.record(LinkId::new(1)).expect("record");
        let sums: Vec<(f64, f64)> = (0..HOURS)
            .map(|h| (record.volumes().sum(h), record.times().sum(h)))
            .collect();
        if reversed {
            reversed_sums = sums;
        } else {
            forward_sums = sums;
        }
    }

    assert_eq!(forward_sums, reversed_sums);
    // Exact expected totals for the forward pass.
    assert!((forward_sums[0].0 - 14.0).abs() < f64::EPSILON);
    assert!((forward_sums[1].0 - 6.0).abs() < f64::EPSILON);
    assert!((forward_sums[0].1 - (40.0 + 60.0 + 96.0)).abs() < f64::EPSILON);
    Ok(())
}

#[rstest]
fn test_daily_bucket_matches_hourly_total_each_call(stats: LinkStats) -> Result<()> {
    stats.reset();
    let passes: [(&[f64], &[f64]); 2] = [
        (&[4.0, 3.0], &[10.0, 20.0]),
        (&[1.0, 0.0], &[10.0, 20.0]),
    ];

    let mut expected_sum = 0.0;
    for (a_volumes, a_times) in passes {
        let (volumes, times) = sources(a_volumes, a_times, &[0.0, 0.0], &[15.0, 15.0]);
        stats.add_data(&volumes, &times)?;
        expected_sum += a_volumes.iter().sum::<f64>();

        let record = stats.record(LinkId::new(1)).expect("record");
        assert!((record.volumes().sum(HOURS) - expected_sum).abs() < f64::EPSILON);
    }

    let record = stats.record(LinkId::new(1)).expect("record");
    assert!((record.volumes().min(HOURS) - 1.0).abs() < f64::EPSILON);
    Ok(())
}

#[rstest]
fn test_reset_is_idempotent(stats: LinkStats) -> Result<()> {
    stats.reset();
    let once: Vec<_> = collect_state(&stats);

    stats.reset();
    stats.reset();
    let twice: Vec<_> = collect_state(&stats);

    assert_eq!(stats.count(), 0);
    assert_eq!(once, twice);
    Ok(())
}

#[rstest]
fn test_reset_discards_previous_session(stats: LinkStats) -> Result<()> {
    stats.reset();
    let (volumes, times) = sources(&[4.0, 0.0], &[10.0, 20.0], &[1.0, 1.0], &[15.0, 15.0]);
    stats.add_data(&volumes, &times)?;
    assert_eq!(stats.count(), 1);

    stats.reset();
    assert_eq!(stats.count(), 0);
    let record = stats.record(LinkId::new(1)).expect("record");
    assert!(!record.is_seeded());
    for hour in 0..=HOURS {
        assert!((record.volumes().sum(hour)).abs() < f64::EPSILON);
        assert!((record.volumes().min(hour)).abs() < f64::EPSILON);
    }
    Ok(())
}

fn collect_state(stats: &LinkStats) -> Vec<(LinkId, bool, Vec<f64>)> {
    [LinkId::new(1), LinkId::new(2)]
        .into_iter()
        .map(|id| {
            let record = stats.record(id).expect("record");
            let sums: Vec<f64> = (0..=HOURS).map(|h| record.volumes().sum(h)).collect();
            (id, record.is_seeded(), sums)
        })
        .collect()
}

#[test]
fn test_store_type_is_exported() {
    // The store type participates in the public API for read access.
    fn assert_send<T: Send>() {}
    assert_send::<LinkStatsStore>();
}
