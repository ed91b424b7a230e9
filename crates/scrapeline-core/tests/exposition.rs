#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use scrapeline_core::exposition::format_value;
use scrapeline_core::{Registry, TextEncoder};

#[test]
fn http_requests_total_end_to_end() {
    let reg = Registry::new();
    let c = reg
        .register_counter("http_requests_total", "Total HTTP requests", &["method", "status"])
        .unwrap();
    for _ in 0..3 {
        c.inc(&["GET", "200"]).unwrap();
    }
    c.inc(&["GET", "500"]).unwrap();

    let text = TextEncoder::new().render_to_string(&reg);
    assert_eq!(
        text,
        "# HELP http_requests_total Total HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total{method=\"GET\",status=\"200\"} 3\n\
         http_requests_total{method=\"GET\",status=\"500\"} 1\n"
    );
}

#[test]
fn unlabeled_series_have_no_braces() {
    let reg = Registry::new();
    let g = reg.register_gauge("http_requests_active", "Active", &[]).unwrap();
    g.set(&[], 2.5).unwrap();

    let text = TextEncoder::new().render_to_string(&reg);
    assert!(text.contains("\nhttp_requests_active 2.5\n"), "{text}");
}

#[test]
fn family_without_series_renders_only_headers() {
    let reg = Registry::new();
    reg.register_counter("never_total", "Never touched", &["kind"]).unwrap();

    let text = TextEncoder::new().render_to_string(&reg);
    assert_eq!(text, "# HELP never_total Never touched\n# TYPE never_total counter\n");
}

#[test]
fn histogram_lines() {
    let reg = Registry::new();
    let h = reg
        .register_histogram("req_seconds", "Latency", &["route"], &[0.1, 1.0])
        .unwrap();
    h.observe(&["/"], 0.0625).unwrap();
    h.observe(&["/"], 0.5).unwrap();
    h.observe(&["/"], 2.0).unwrap();

    let text = TextEncoder::new().render_to_string(&reg);
    let expected = "# HELP req_seconds Latency\n\
                    # TYPE req_seconds histogram\n\
                    req_seconds_bucket{route=\"/\",le=\"0.1\"} 1\n\
                    req_seconds_bucket{route=\"/\",le=\"1\"} 2\n\
                    req_seconds_bucket{route=\"/\",le=\"+Inf\"} 3\n\
                    req_seconds_sum{route=\"/\"} 2.5625\n\
                    req_seconds_count{route=\"/\"} 3\n";
    assert_eq!(text, expected);
}

#[test]
fn label_values_and_help_are_escaped() {
    let reg = Registry::new();
    let c = reg
        .register_counter("odd_total", "Line one\nback\\slash", &["v"])
        .unwrap();
    c.inc(&["say \"hi\"\\now\n"]).unwrap();

    let text = TextEncoder::new().render_to_string(&reg);
    assert!(text.contains("# HELP odd_total Line one\\nback\\\\slash\n"));
    assert!(text.contains("odd_total{v=\"say \\\"hi\\\"\\\\now\\n\"} 1\n"), "{text}");

    let samples = common::parse(&text);
    assert_eq!(samples[0].label("v"), Some("say \"hi\"\\now\n"));
}

#[test]
fn renders_are_byte_identical_without_updates() {
    let reg = Registry::new();
    let c = reg.register_counter("a_total", "A", &["k"]).unwrap();
    let h = reg.register_histogram("b_seconds", "B", &["k"], &[]).unwrap();
    for k in ["z", "m", "a", "q"] {
        c.inc(&[k]).unwrap();
        h.observe(&[k], 0.3).unwrap();
    }

    let enc = TextEncoder::new();
    let first = enc.render(&reg);
    let second = enc.render(&reg);
    assert_eq!(first, second);

    let text = String::from_utf8(first.to_vec()).unwrap();
    let order: Vec<_> = common::parse(&text)
        .into_iter()
        .filter(|s| s.name == "a_total")
        .map(|s| s.label("k").unwrap().to_string())
        .collect();
    assert_eq!(order, ["a", "m", "q", "z"]);
}

#[test]
fn parsed_output_matches_registry_state() {
    let reg = Registry::new();
    let c = reg
        .register_counter("events_total", "Events", &["event_type"])
        .unwrap();
    let g = reg.register_gauge("temperature", "Temp", &["room"]).unwrap();
    let h = reg
        .register_histogram("dur_seconds", "Dur", &["method"], &[0.25, 0.5])
        .unwrap();

    c.inc_by(&["data_request"], 4.0).unwrap();
    c.inc(&["slow_request"]).unwrap();
    g.set(&["lab"], -3.25).unwrap();
    g.set(&["office"], 21.0).unwrap();
    for v in [0.1, 0.3, 0.3, 0.9] {
        h.observe(&["GET"], v).unwrap();
    }

    let text = TextEncoder::new().render_to_string(&reg);
    let samples = common::parse(&text);

    let find = |name: &str, labels: &[(&str, &str)]| -> f64 {
        samples
            .iter()
            .find(|s| {
                s.name == name
                    && s.labels.len() == labels.len()
                    && labels.iter().all(|(k, v)| s.label(k) == Some(*v))
            })
            .unwrap_or_else(|| panic!("missing {name} {labels:?}"))
            .value_f64()
    };

    for series in c.family().series() {
        let ev = series.label_values()[0].as_str();
        assert_eq!(find("events_total", &[("event_type", ev)]), series.value().unwrap());
    }
    assert_eq!(find("temperature", &[("room", "lab")]), -3.25);
    assert_eq!(find("temperature", &[("room", "office")]), 21.0);

    let snap = h.with_label_values(&["GET"]).unwrap().histogram_snapshot().unwrap();
    for (bound, count) in &snap.buckets {
        let le = format_value(*bound);
        assert_eq!(
            find("dur_seconds_bucket", &[("method", "GET"), ("le", le.as_str())]),
            *count as f64
        );
    }
    assert_eq!(find("dur_seconds_count", &[("method", "GET")]), 4.0);
    assert!((find("dur_seconds_sum", &[("method", "GET")]) - snap.sum).abs() < 1e-12);
    assert_eq!(samples.len(), 2 + 2 + snap.buckets.len() + 2);
}

#[test]
fn value_formatting() {
    assert_eq!(format_value(3.0), "3");
    assert_eq!(format_value(0.005), "0.005");
    assert_eq!(format_value(-2.5), "-2.5");
    assert_eq!(format_value(f64::INFINITY), "+Inf");
    assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    assert_eq!(format_value(f64::NAN), "NaN");
}
