//! ABOUTME: Integration tests for registry wiring and text exposition
//! ABOUTME: Tests the manager from configuration through to encoded metrics

use dp_collector::{encode_text, FieldKind, PrometheusManager, StatGroup};
use dp_config::{Config, MetricsConfig};
use dp_core::{Error, StatRecord};
use prometheus_client::registry::Registry;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};
use test_support::{filled_record, record, FakeStatSource};

fn pool(name: &str) -> StatRecord {
    let gauges: Vec<&str> = dp_collector::fields::fields_of(StatGroup::Pool)
        .filter(|f| f.kind == FieldKind::Gauge)
        .map(|f| f.name)
        .collect();
    filled_record(
        record(json!({
            "Name": name,
            "ActiveCount": 5,
            "TransactionHistogram": [3, 0, 1, 2, 0, 0, 0],
        })),
        gauges,
        ["ConnectionHoldTimeHistogram"],
    )
}

fn statement(base: StatRecord) -> StatRecord {
    let fields_of = |kind: FieldKind| {
        dp_collector::fields::fields_of(StatGroup::Statement)
            .filter(move |f| f.kind == kind)
            .map(|f| f.name)
            .collect::<Vec<&str>>()
    };
    filled_record(
        base,
        fields_of(FieldKind::Gauge),
        fields_of(FieldKind::Histogram),
    )
}

fn metrics_config(toml: &str) -> MetricsConfig {
    Config::from_toml_str(toml).expect("valid config").metrics
}

#[test]
fn test_registered_collector_is_encoded() {
    let config = metrics_config(
        r#"
        [metrics]
        tags = { env = "prod" }
        enable = { druid-sql = false, druid-uri = false }
        "#,
    );
    let source = Arc::new(FakeStatSource::new().with_pool(pool("p1")));
    let manager = PrometheusManager::new(&config, source).unwrap();

    let mut registry = Registry::default();
    manager.register(&mut registry);
    let text = encode_text(&registry).unwrap();

    assert!(text.contains("# HELP druid_active_count Druid ActiveCount"));
    assert!(text.contains("# TYPE druid_active_count gauge"));
    assert!(text.contains("druid_active_count{env=\"prod\",pool=\"p1\"} 5"));
    assert!(text.contains("# TYPE druid_transaction_histogram_bucket gauge"));
    assert!(text.contains("druid_transaction_histogram_bucket{env=\"prod\",pool=\"p1\",le=\"1ms\"} 3"));
    assert!(text.contains("druid_transaction_histogram_bucket{env=\"prod\",pool=\"p1\",le=\"1s\"} 2"));
    assert!(!text.contains("druid_sql_"));
    assert!(!text.contains("druid_uri_"));
}

#[test]
fn test_disabled_collector_is_not_created() {
    let config = metrics_config("[metrics.enable]\ndruid = false\n");
    let manager =
        PrometheusManager::new(&config, Arc::new(FakeStatSource::new().with_pool(pool("p1"))))
            .unwrap();

    assert!(!manager.is_enabled());
    assert!(manager.collector().is_none());

    let mut registry = Registry::default();
    manager.register(&mut registry);
    assert!(!encode_text(&registry).unwrap().contains("druid_"));
}

#[test]
fn test_group_flags_follow_configuration() {
    let config = metrics_config("[metrics.enable]\ndruid-uri = false\n");
    let manager = PrometheusManager::new(&config, Arc::new(FakeStatSource::new())).unwrap();

    assert!(manager.is_key_enabled("druid-sql"));
    assert!(!manager.is_key_enabled("druid-uri"));

    let collector = manager.collector().expect("collector enabled");
    assert!(collector.is_statement_enabled());
    assert!(!collector.is_endpoint_enabled());
}

#[test]
fn test_runtime_toggle_reaches_registered_collector() {
    let config = MetricsConfig::default();
    let source = Arc::new(
        FakeStatSource::new()
            .with_pool(pool("p1"))
            .with_endpoint(record(json!({
                "URI": "/orders",
                "RequestCount": 1,
                "RequestTimeMillisMax": 0,
                "RequestTimeMillis": 0,
                "RunningCount": 0,
                "ConcurrentMax": 0,
                "JdbcExecuteTimeMillis": 0,
                "JdbcExecuteCount": 0,
                "JdbcExecuteErrorCount": 0,
                "Histogram": [0, 0, 0, 0, 0, 0, 0],
            }))),
    );
    let manager = PrometheusManager::new(&config, source).unwrap();
    let mut registry = Registry::default();
    manager.register(&mut registry);

    assert!(encode_text(&registry).unwrap().contains("druid_uri_request_count{uri=\"/orders\"} 1"));

    manager.collector().unwrap().set_endpoint_enabled(false);
    assert!(!encode_text(&registry).unwrap().contains("druid_uri_"));
}

#[test]
fn test_failed_scrape_fails_encoding() {
    let source = Arc::new(FakeStatSource::new().with_pool(pool("p1")));
    let manager = PrometheusManager::new(&MetricsConfig::default(), source.clone()).unwrap();
    let mut registry = Registry::default();
    manager.register(&mut registry);

    source.remove_pool_field("ActiveCount");
    assert!(matches!(encode_text(&registry), Err(Error::Encode(_))));
}

#[test]
fn test_invalid_tags_fail_construction() {
    let mut config = MetricsConfig::default();
    config.tags.insert("le".to_string(), "x".to_string());

    let result = PrometheusManager::new(&config, Arc::new(FakeStatSource::new()));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_label_values_are_escaped_in_text_output() {
    let mut failing = statement(record(json!({
        "Name": "p1",
        "SQL": r#"select "a\b" from t"#,
        "ExecuteCount": 4,
    })));
    failing.insert("LastErrorTime", UNIX_EPOCH + Duration::from_millis(5));
    failing.insert("LastErrorClass", "java.sql.SQLException");
    failing.insert("LastErrorMessage", "line1\nline2 \"q\"");

    let source = Arc::new(FakeStatSource::new().with_statement("p1", failing));
    let manager = PrometheusManager::new(&MetricsConfig::default(), source).unwrap();
    let mut registry = Registry::default();
    manager.register(&mut registry);
    let text = encode_text(&registry).unwrap();

    assert!(text.contains(r#"druid_sql_execute_count{pool="p1",sql="select \"a\\b\" from t"} 4"#));
    assert!(text.contains(concat!(
        r#"druid_sql_last_error_time{pool="p1",sql="select \"a\\b\" from t","#,
        r#"class="java.sql.SQLException",message="line1\nline2 \"q\""} 5"#,
    )));
    assert!(text
        .lines()
        .all(|line| line.starts_with('#') || line.starts_with("druid_")));

    let collected = manager.collector().unwrap().collect().unwrap();
    let errors = collected
        .iter()
        .find(|f| f.name == "druid_sql_last_error_time")
        .unwrap();
    assert_eq!(errors.samples[0].label_values[3], "line1\nline2 \"q\"");
}
