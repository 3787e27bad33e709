#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use beacon_core::metrics::{Counter, Gauge, Histogram, HistogramOptions, MetricOptions, UpDownCounter};
use beacon_core::{Meter, PrometheusMeter};
use proptest::prelude::*;

fn described(text: &str) -> MetricOptions {
    MetricOptions { description: Some(text.into()) }
}

#[test]
fn empty_meter_renders_nothing() {
    let meter = PrometheusMeter::new();
    let _ = meter.create_counter("unused", MetricOptions::default());
    let _ = meter.create_histogram("idle", HistogramOptions::default()).unwrap();
    assert_eq!(meter.len(), 2);
    assert_eq!(meter.report(), "");
}

#[test]
fn counter_block_layout() {
    let meter = PrometheusMeter::new();
    let c = meter.create_counter("requests", described("Handled requests"));
    c.increment(&[("route", "/b"), ("code", "200")]).unwrap();
    c.add(2.0, &[("code", "200"), ("route", "/a")]).unwrap();
    c.increment(&[]).unwrap();

    let expected = [
        "# HELP requests_total Handled requests",
        "# TYPE requests_total counter",
        "requests_total 1",
        r#"requests_total{code="200",route="/a"} 2"#,
        r#"requests_total{code="200",route="/b"} 1"#,
    ]
    .join("\n");
    assert_eq!(meter.report(), expected);
}

#[test]
fn missing_description_placeholder() {
    let meter = PrometheusMeter::new();
    meter.create_gauge("temp", MetricOptions::default()).record(21.5, &[]);
    assert_eq!(
        meter.report(),
        "# HELP temp description missing\n# TYPE temp gauge\ntemp 21.5"
    );
}

#[test]
fn up_down_counter_reports_as_counter() {
    let meter = PrometheusMeter::new();
    let c = meter.create_up_down_counter("in-flight", MetricOptions::default());
    c.add(3.0, &[]);
    c.sub(5.0, &[]);
    assert_eq!(
        meter.report(),
        "# HELP in_flight_total description missing\n# TYPE in_flight_total counter\nin_flight_total -2"
    );
}

#[test]
fn histogram_end_to_end() {
    let meter = PrometheusMeter::new();
    let h = meter.create_histogram("latency", HistogramOptions::default()).unwrap();
    for v in [0.0, 1.0, 49.0, 50.0, 51.0, 52.0] {
        h.record(v, &[]);
    }

    let report = meter.report();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "# HELP latency_distribution description missing");
    assert_eq!(lines[1], "# TYPE latency_distribution histogram");
    assert_eq!(lines[2], "latency_distribution_count 6");
    assert_eq!(lines[3], "latency_distribution_sum 203");

    let buckets: Vec<(&str, u64)> = lines[4..]
        .iter()
        .map(|l| {
            let (series, count) = l.rsplit_once(' ').unwrap();
            let le = series.split("le=\"").nth(1).unwrap().trim_end_matches("\"}");
            (le, count.parse().unwrap())
        })
        .collect();
    assert_eq!(buckets.len(), 16);
    assert_eq!(buckets[0], ("0", 1));
    assert_eq!(buckets[1], ("5", 2));
    assert_eq!(buckets[3], ("25", 2));
    assert_eq!(buckets[4], ("50", 4));
    assert_eq!(buckets[5], ("75", 6));
    assert_eq!(buckets[15], ("+Inf", 6));

    // cumulative counts never decrease and end at the total count
    assert!(buckets.windows(2).all(|w| w[0].1 <= w[1].1));
    assert_eq!(buckets.last().unwrap().1, 6);
}

#[test]
fn histogram_labels_prefix_le() {
    let meter = PrometheusMeter::new();
    let h = meter
        .create_histogram(
            "size",
            HistogramOptions {
                description: Some("Payload size".into()),
                bucket_descriptors: Some(vec![
                    beacon_core::metrics::BucketDescriptor::new("10", f64::NEG_INFINITY, 10.0),
                    beacon_core::metrics::BucketDescriptor::new("+Inf", 10.0, f64::INFINITY),
                ]),
            },
        )
        .unwrap();
    h.record(4.0, &[("kind", "text")]);
    h.record(40.0, &[("kind", "text")]);

    let expected = [
        "# HELP size_distribution Payload size",
        "# TYPE size_distribution histogram",
        r#"size_distribution_count{kind="text"} 2"#,
        r#"size_distribution_sum{kind="text"} 44"#,
        r#"size_distribution_bucket{kind="text",le="10"} 1"#,
        r#"size_distribution_bucket{kind="text",le="+Inf"} 2"#,
    ]
    .join("\n");
    assert_eq!(meter.report(), expected);
}

#[test]
fn blocks_sorted_by_kind_then_name() {
    let meter = PrometheusMeter::new();
    meter.create_gauge("a_gauge", MetricOptions::default()).record(1.0, &[]);
    meter.create_counter("z_counter", MetricOptions::default()).increment(&[]).unwrap();
    meter
        .create_histogram("m_hist", HistogramOptions::default())
        .unwrap()
        .record(1.0, &[]);

    let report = meter.report();
    let types: Vec<&str> = report.lines().filter(|l| l.starts_with("# TYPE")).collect();
    assert_eq!(
        types,
        vec![
            "# TYPE z_counter_total counter",
            "# TYPE a_gauge gauge",
            "# TYPE m_hist_distribution histogram",
        ]
    );
}

#[test]
fn invalid_buckets_fail_at_creation() {
    let meter = PrometheusMeter::new();
    let err = meter
        .create_histogram(
            "broken",
            HistogramOptions {
                description: None,
                bucket_descriptors: Some(vec![beacon_core::metrics::BucketDescriptor::new("1", 1.0, 0.0)]),
            },
        )
        .err()
        .expect("must fail");
    assert_eq!(err.kind().as_str(), "INVALID_BUCKET");
    assert!(meter.is_empty());
}

type Observation = (u8, u8, u16);

fn replay(observations: &[Observation]) -> String {
    let meter = PrometheusMeter::new();
    let c = meter.create_counter("events", MetricOptions::default());
    let h = meter.create_histogram("latency", HistogramOptions::default()).unwrap();
    let regions = ["eu", "us", "ap"];
    let kinds = ["read", "write"];
    for (r, k, v) in observations {
        let region = regions[*r as usize % regions.len()];
        let kind = kinds[*k as usize % kinds.len()];
        c.add(f64::from(*v), &[("region", region), ("kind", kind)]).unwrap();
        h.record(f64::from(*v), &[("kind", kind), ("region", region)]);
    }
    meter.report()
}

proptest! {
    #[test]
    fn report_is_independent_of_call_order(
        observations in prop::collection::vec((any::<u8>(), any::<u8>(), 0u16..20_000), 1..48),
    ) {
        let mut reversed = observations.clone();
        reversed.reverse();
        prop_assert_eq!(replay(&observations), replay(&reversed));
    }
}
