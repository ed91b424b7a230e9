#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use scrapeline_core::{MetricDescriptor, MetricKind, MetricsError, Registry, DEFAULT_BUCKETS};

#[test]
fn identical_registration_is_idempotent() {
    let reg = Registry::new();
    let a = reg
        .register(MetricDescriptor::counter("jobs_total", "Jobs", &["queue"]))
        .unwrap();
    let b = reg
        .register(MetricDescriptor::counter("jobs_total", "Jobs", &["queue"]))
        .unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(reg.len(), 1);
}

#[test]
fn help_text_difference_keeps_first_family() {
    let reg = Registry::new();
    let a = reg.register_counter("jobs_total", "Jobs", &[]).unwrap();
    let b = reg.register_counter("jobs_total", "All jobs", &[]).unwrap();
    assert!(Arc::ptr_eq(a.family(), b.family()));
    assert_eq!(b.family().descriptor().help(), "Jobs");
}

#[test]
fn conflicting_kind_is_rejected() {
    let reg = Registry::new();
    reg.register_counter("queue_depth", "Depth", &["queue"]).unwrap();
    let err = reg.register_gauge("queue_depth", "Depth", &["queue"]).unwrap_err();
    assert!(matches!(err, MetricsError::DuplicateMetric { .. }));
    assert_eq!(reg.get("queue_depth").unwrap().kind(), MetricKind::Counter);
}

#[test]
fn conflicting_labels_are_rejected() {
    let reg = Registry::new();
    reg.register_counter("hits_total", "Hits", &["method", "route"]).unwrap();

    let reordered = reg.register_counter("hits_total", "Hits", &["route", "method"]);
    assert!(matches!(reordered, Err(MetricsError::DuplicateMetric { .. })));

    let fewer = reg.register_counter("hits_total", "Hits", &["method"]);
    assert!(matches!(fewer, Err(MetricsError::DuplicateMetric { .. })));
}

#[test]
fn conflicting_buckets_are_rejected() {
    let reg = Registry::new();
    reg.register_histogram("latency_seconds", "Latency", &[], &[0.1, 1.0]).unwrap();
    let err = reg
        .register_histogram("latency_seconds", "Latency", &[], &[0.5, 1.0])
        .unwrap_err();
    assert!(matches!(err, MetricsError::DuplicateMetric { .. }));

    // trailing +Inf is implied, so this is the same layout
    reg.register_histogram("latency_seconds", "Latency", &[], &[0.1, 1.0, f64::INFINITY])
        .unwrap();
}

#[test]
fn empty_buckets_select_defaults() {
    let reg = Registry::new();
    let h = reg.register_histogram("wait_seconds", "Wait", &[], &[]).unwrap();
    assert_eq!(h.family().descriptor().buckets(), &DEFAULT_BUCKETS[..]);
}

#[test]
fn invalid_descriptors_are_rejected() {
    let reg = Registry::new();

    let cases = [
        MetricDescriptor::counter("1bad", "x", &[]),
        MetricDescriptor::counter("bad-name", "x", &[]),
        MetricDescriptor::counter("ok_total", "x", &["bad-label"]),
        MetricDescriptor::counter("ok_total", "x", &["__reserved"]),
        MetricDescriptor::counter("ok_total", "x", &["a", "a"]),
        MetricDescriptor::histogram("h", "x", &["le"], &[1.0]),
        MetricDescriptor::histogram("h", "x", &[], &[2.0, 1.0]),
        MetricDescriptor::histogram("h", "x", &[], &[1.0, 1.0]),
        MetricDescriptor::histogram("h", "x", &[], &[f64::NAN]),
        MetricDescriptor::histogram("h", "x", &[], &[f64::INFINITY]),
    ];
    for desc in cases {
        let err = reg.register(desc.clone()).unwrap_err();
        assert!(
            matches!(err, MetricsError::InvalidDescriptor { .. }),
            "{desc:?} -> {err:?}"
        );
    }
    assert!(reg.is_empty());
}

#[test]
fn families_are_sorted_by_name() {
    let reg = Registry::new();
    reg.register_gauge("zeta", "z", &[]).unwrap();
    reg.register_counter("alpha_total", "a", &[]).unwrap();
    reg.register_histogram("mid_seconds", "m", &[], &[]).unwrap();

    let names: Vec<String> = reg.families().iter().map(|f| f.name().to_string()).collect();
    assert_eq!(names, ["alpha_total", "mid_seconds", "zeta"]);
}

#[test]
fn global_registry_is_shared() {
    let a = Registry::global();
    let b = Registry::global();
    assert!(std::ptr::eq(a, b));

    a.register_counter("global_probe_total", "probe", &[]).unwrap();
    assert!(b.get("global_probe_total").is_some());
}

#[test]
fn concurrent_registration_yields_one_family() {
    let reg = Arc::new(Registry::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                reg.register(MetricDescriptor::counter("race_total", "Race", &["k"]))
                    .unwrap()
            })
        })
        .collect();
    let seen: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(seen.iter().all(|f| Arc::ptr_eq(f, &seen[0])));
    assert_eq!(reg.len(), 1);

    seen[3].get_or_create_series(&["x"]).unwrap().inc_by(1.0).unwrap();
    assert_eq!(
        reg.get("race_total").unwrap().series()[0].value(),
        Some(1.0)
    );
}

#[test]
fn concurrent_conflicting_registration_keeps_first_winner() {
    let reg = Arc::new(Registry::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                let desc = if i % 2 == 0 {
                    MetricDescriptor::counter("split_total", "Split", &[])
                } else {
                    MetricDescriptor::gauge("split_total", "Split", &[])
                };
                reg.register(desc).map(|f| f.kind())
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winner = reg.get("split_total").unwrap().kind();
    for r in results {
        match r {
            Ok(kind) => assert_eq!(kind, winner),
            Err(e) => assert!(matches!(e, MetricsError::DuplicateMetric { .. })),
        }
    }
    assert_eq!(reg.len(), 1);
}
