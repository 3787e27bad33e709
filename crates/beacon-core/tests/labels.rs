#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeMap;

use beacon_core::labels::{canonicalize, normalize_name};
use proptest::prelude::*;

#[test]
fn empty_label_set_is_empty_key() {
    let none: [(&str, &str); 0] = [];
    assert_eq!(canonicalize(none), "");
}

#[test]
fn keys_are_sorted_and_quoted() {
    let key = canonicalize([("route", "/v1"), ("method", "GET")]);
    assert_eq!(key, r#"method="GET",route="/v1""#);
}

#[test]
fn values_are_escaped() {
    let key = canonicalize([("msg", "say \"hi\"\nnow")]);
    assert_eq!(key, r#"msg="say \"hi\"\nnow""#);
}

#[test]
fn repeated_key_keeps_last_value() {
    let key = canonicalize([("a", "1"), ("b", "2"), ("a", "3")]);
    assert_eq!(key, r#"a="3",b="2""#);
}

#[test]
fn names_are_normalized_once() {
    assert_eq!(normalize_name("http-requests", Some("_total")), "http_requests_total");
    assert_eq!(normalize_name("http_requests_total", Some("_total")), "http_requests_total");
    assert_eq!(normalize_name("queue-depth", None), "queue_depth");
}

proptest! {
    #[test]
    fn canonical_key_ignores_insertion_order(
        map in prop::collection::btree_map("[a-z_]{1,8}", "[ -~]{0,12}", 0..8),
        seed in any::<u64>(),
    ) {
        let forward: Vec<(String, String)> = map.clone().into_iter().collect();
        let mut shuffled = forward.clone();
        // deterministic rotation + reverse stands in for an arbitrary permutation
        if !shuffled.is_empty() {
            let by = (seed as usize) % shuffled.len();
            shuffled.rotate_left(by);
            if seed % 2 == 0 {
                shuffled.reverse();
            }
        }
        let from_map: BTreeMap<String, String> = map;
        prop_assert_eq!(canonicalize(forward.clone()), canonicalize(shuffled));
        prop_assert_eq!(canonicalize(forward), canonicalize(from_map));
    }
}
