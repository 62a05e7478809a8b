//! Text exposition output.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use swarmstat_core::metrics::render::{format_labels, format_value};
use swarmstat_core::metrics::{render, MetricKind, Registry};

#[test]
fn renders_help_type_and_series_lines() {
    let reg = Registry::new();
    reg.describe("jobs_total", MetricKind::Counter, "Jobs processed.").unwrap();
    reg.add("jobs_total", &[("queue", "default")], 3.0).unwrap();
    reg.set("workers", &[], 2.0).unwrap();

    let out = render(&reg.snapshot());
    let expected = "\
# HELP jobs_total Jobs processed.
# TYPE jobs_total counter
jobs_total{queue=\"default\"} 3
# TYPE workers gauge
workers 2
";
    assert_eq!(out, expected);
}

#[test]
fn multiple_labels_are_sorted_and_comma_space_joined() {
    let reg = Registry::new();
    reg.inc("req", &[("method", "GET"), ("endpoint", "/login")]).unwrap();
    let out = render(&reg.snapshot());
    assert!(out.contains("req{endpoint=\"/login\", method=\"GET\"} 1\n"));
}

#[test]
fn label_values_are_escaped() {
    let labels = vec![("path".to_string(), "a\"b\\c\nd".to_string())];
    assert_eq!(format_labels(&labels), "{path=\"a\\\"b\\\\c\\nd\"}");
    assert_eq!(format_labels(&[]), "");
}

#[test]
fn values_use_exposition_spelling() {
    assert_eq!(format_value(120.0), "120");
    assert_eq!(format_value(0.0), "0");
    assert_eq!(format_value(0.25), "0.25");
    assert_eq!(format_value(f64::NAN), "NaN");
    assert_eq!(format_value(f64::INFINITY), "+Inf");
    assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
}

#[test]
fn empty_snapshot_renders_empty_body() {
    let reg = Registry::new();
    assert_eq!(render(&reg.snapshot()), "");
}

#[test]
fn rendering_twice_is_identical() {
    let reg = Registry::new();
    for ep in ["/c", "/a", "/b"] {
        reg.inc("req", &[("endpoint", ep)]).unwrap();
        reg.set("lat", &[("endpoint", ep)], 1.5).unwrap();
    }
    let snap = reg.snapshot();
    assert_eq!(render(&snap), render(&snap));
    assert_eq!(render(&snap), render(&reg.snapshot()));
}
