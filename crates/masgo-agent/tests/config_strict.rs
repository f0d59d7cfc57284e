#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use masgo_agent::config;
use masgo_agent::reporter::Reporter;
use masgo_core::{ClientCode, MasgoError};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
agent:
  poll_interval: 2000 # typo should fail
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, MasgoError::Config(_)));
    assert_eq!(err.client_code(), ClientCode::Internal);
}

#[test]
fn defaults_match_fixed_constants() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.agent.server_address, "http://localhost:8080");
    assert_eq!(cfg.agent.poll_interval(), Duration::from_secs(2));
    assert_eq!(cfg.agent.report_interval(), Duration::from_secs(10));
    assert_eq!(cfg.agent.request_timeout(), Duration::from_secs(5));
}

#[test]
fn intervals_are_range_checked() {
    let bad = r#"
version: 1
agent:
  report_interval_ms: 10
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("report_interval_ms"));
}

#[test]
fn server_address_needs_scheme() {
    let bad = r#"
version: 1
agent:
  server_address: "localhost:8080"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("server_address"));
}

#[test]
fn https_server_address_is_usable() {
    let ok = r#"
version: 1
agent:
  server_address: "https://metrics.example.com:8443"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let reporter = Reporter::new(&cfg.agent.server_address, cfg.agent.request_timeout())
        .expect("tls-capable client");
    assert_eq!(reporter.base(), "https://metrics.example.com:8443");
}
