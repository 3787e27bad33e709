#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use beacon_core::metrics::histogram::sort_and_validate;
use beacon_core::metrics::{
    default_buckets, Aggregation, BucketDescriptor, Counter, Gauge, Histogram, HistogramOptions,
    MetricOptions, PromCounter, PromCumulativeHistogram, PromGauge, UpDownCounter,
};
use proptest::prelude::*;

#[test]
fn counter_sums_from_first_value() {
    let c = PromCounter::monotonic("jobs", MetricOptions::default(), Aggregation::Standard);
    Counter::add(&c, 5.0, &[("queue", "a")]).unwrap();
    Counter::add(&c, 2.5, &[("queue", "a")]).unwrap();
    assert_eq!(c.value(&[("queue", "a")]), Some(7.5));
    assert_eq!(c.value(&[("queue", "b")]), None);
    assert_eq!(c.name(), "jobs_total");
}

#[test]
fn counter_rejects_negative_and_nan() {
    let c = PromCounter::monotonic("jobs", MetricOptions::default(), Aggregation::Standard);
    let err = Counter::add(&c, -1.0, &[]).expect_err("negative must fail");
    assert_eq!(err.kind().as_str(), "INVALID_VALUE");
    assert!(Counter::add(&c, f64::NAN, &[]).is_err());
    assert_eq!(c.value(&[]), None);
}

#[test]
fn legacy_aggregation_seeds_one() {
    let c = PromCounter::monotonic("jobs", MetricOptions::default(), Aggregation::Legacy);
    Counter::add(&c, 5.0, &[]).unwrap();
    Counter::add(&c, 5.0, &[]).unwrap();
    assert_eq!(c.value(&[]), Some(6.0));

    let g = PromGauge::new("temp", MetricOptions::default(), Aggregation::Legacy);
    g.record(20.0, &[]);
    g.record(21.0, &[]);
    assert_eq!(g.value(&[]), Some(22.0));
}

#[test]
fn up_down_counter_goes_both_ways() {
    let c = PromCounter::up_down("in-flight", MetricOptions::default(), Aggregation::Standard);
    UpDownCounter::increment(&c, &[]);
    UpDownCounter::increment(&c, &[]);
    UpDownCounter::decrement(&c, &[]);
    UpDownCounter::sub(&c, 3.0, &[]);
    assert_eq!(c.value(&[]), Some(-2.0));
    assert_eq!(c.name(), "in_flight_total");
}

#[test]
fn gauge_keeps_last_value() {
    let g = PromGauge::new("queue-depth", MetricOptions::default(), Aggregation::Standard);
    g.record(10.0, &[("q", "x")]);
    g.record(3.0, &[("q", "x")]);
    assert_eq!(g.value(&[("q", "x")]), Some(3.0));
    assert_eq!(g.name(), "queue_depth");
}

#[test]
fn default_buckets_cover_the_real_line() {
    let b = default_buckets();
    assert_eq!(b.len(), 16);
    assert_eq!(b[0].label, "0");
    assert_eq!(b[0].lower(), f64::NEG_INFINITY);
    assert_eq!(b[14].label, "10000");
    assert_eq!(b[15].label, "+Inf");
    assert_eq!(b[15].upper(), f64::INFINITY);
}

#[test]
fn buckets_are_sorted_by_lower_edge() {
    let sorted = sort_and_validate(vec![
        BucketDescriptor::new("20", 10.0, 20.0),
        BucketDescriptor::new("10", 0.0, 10.0),
    ])
    .unwrap();
    assert_eq!(sorted[0].label, "10");
    assert_eq!(sorted[1].label, "20");
}

#[test]
fn overlapping_buckets_are_fatal() {
    let err = sort_and_validate(vec![
        BucketDescriptor::new("10", 0.0, 10.0),
        BucketDescriptor::new("15", 5.0, 15.0),
    ])
    .expect_err("overlap must fail");
    assert_eq!(err.kind().as_str(), "INVALID_BUCKET");
}

#[test]
fn empty_width_buckets_are_fatal() {
    assert!(sort_and_validate(vec![BucketDescriptor::new("5", 5.0, 5.0)]).is_err());
    assert!(sort_and_validate(vec![BucketDescriptor::new("5", 6.0, 5.0)]).is_err());
    assert!(sort_and_validate(vec![]).is_err());
}

#[test]
fn gaps_drop_values_silently() {
    let h = PromCumulativeHistogram::new(
        "gappy",
        HistogramOptions {
            description: None,
            bucket_descriptors: Some(vec![
                BucketDescriptor::new("10", 0.0, 10.0),
                BucketDescriptor::new("30", 20.0, 30.0),
            ]),
        },
    )
    .unwrap();
    h.record(15.0, &[]);
    assert_eq!(h.totals(&[]), None);
    h.record(25.0, &[]);
    assert_eq!(h.totals(&[]), Some((1, 25.0)));
    assert_eq!(h.bucket_counts(&[]), Some(vec![0, 1]));
}

#[test]
fn bucket_edges_are_upper_inclusive() {
    let h = PromCumulativeHistogram::new("latency", HistogramOptions::default()).unwrap();
    for v in [0.0, 5.0, 5.000001, 10000.0, 10000.5] {
        h.record(v, &[]);
    }
    let counts = h.bucket_counts(&[]).unwrap();
    assert_eq!(counts[0], 1); // 0
    assert_eq!(counts[1], 1); // 5
    assert_eq!(counts[2], 1); // 5.000001
    assert_eq!(counts[14], 1); // 10000
    assert_eq!(counts[15], 1); // 10000.5
}

proptest! {
    #[test]
    fn counter_equals_sum_of_additions(values in prop::collection::vec(0u32..10_000, 1..64)) {
        let c = PromCounter::monotonic("sum", MetricOptions::default(), Aggregation::Standard);
        for v in &values {
            Counter::add(&c, f64::from(*v), &[("k", "v")]).unwrap();
        }
        let expected: f64 = values.iter().map(|v| f64::from(*v)).sum();
        prop_assert_eq!(c.value(&[("k", "v")]), Some(expected));
    }

    #[test]
    fn each_record_hits_exactly_one_bucket(values in prop::collection::vec(-1.0e6f64..1.0e6, 1..64)) {
        let h = PromCumulativeHistogram::new("h", HistogramOptions::default()).unwrap();
        for (i, v) in values.iter().enumerate() {
            h.record(*v, &[]);
            let counts = h.bucket_counts(&[]).unwrap();
            prop_assert_eq!(counts.iter().sum::<u64>(), (i + 1) as u64);
            prop_assert_eq!(h.totals(&[]).unwrap().0, (i + 1) as u64);
        }
    }
}
