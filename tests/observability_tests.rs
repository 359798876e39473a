use ledger_core::observability::{
    mask_iban, mask_sensitive, AggregatedHealth, DependencyHealth, HealthStatus, LatencyTimer,
    LogConfig, LogFormat, Metrics,
};

#[test]
fn test_log_config_default() {
    let config = LogConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(config.include_target);
    assert!(!config.include_file);
    assert!(!config.include_line);
}

#[test]
fn test_log_format_from_str() {
    assert_eq!(LogFormat::from("json"), LogFormat::Json);
    assert_eq!(LogFormat::from("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::from("compact"), LogFormat::Compact);
    assert_eq!(LogFormat::from("COMPACT"), LogFormat::Compact);
    assert_eq!(LogFormat::from("pretty"), LogFormat::Pretty);
    assert_eq!(LogFormat::from("unknown"), LogFormat::Pretty);
}

#[test]
fn test_mask_sensitive_short_string() {
    let result = mask_sensitive("abc", 2);
    assert_eq!(result, "***");
}

#[test]
fn test_mask_sensitive_long_string() {
    let result = mask_sensitive("1234567890", 2);
    assert_eq!(result, "12******90");
}

#[test]
fn test_mask_sensitive_exact_boundary() {
    let result = mask_sensitive("1234", 2);
    assert_eq!(result, "****");
}

#[test]
fn test_mask_iban() {
    let masked = mask_iban("DE89370400440532013000");
    assert!(masked.starts_with("DE89"));
    assert!(masked.ends_with("3000"));
    assert!(masked.contains('*'));
    assert_eq!(masked.len(), "DE89370400440532013000".len());
}

#[test]
fn test_metrics_entry_recording() {
    let metrics = Metrics::new();
    metrics.record_entry_recorded("DEPOSIT", "COMPLETED");
    metrics.record_entry_recorded("TRANSFER", "PENDING");
    metrics.record_entry_failed("WITHDRAWAL", "balance_update");
    metrics.record_entry_cancelled("DEPOSIT");
    metrics.record_reference_collision();
}

#[test]
fn test_metrics_latency_recording() {
    let metrics = Metrics::new();
    metrics.record_ledger_write_latency(5.5);
    metrics.record_search_latency(12.0);
}

#[test]
fn test_metrics_collaborator_recording() {
    let metrics = Metrics::new();
    metrics.record_collaborator_call("account", true);
    metrics.record_collaborator_call("notification", false);
}

#[test]
fn test_latency_timer() {
    let timer = LatencyTimer::new();
    std::thread::sleep(std::time::Duration::from_millis(10));
    let elapsed = timer.elapsed_ms();
    assert!(elapsed >= 10.0);
    assert!(elapsed < 1000.0);
}

#[test]
fn test_health_status_checks() {
    assert!(HealthStatus::Healthy.is_healthy());
    assert!(!HealthStatus::Healthy.is_degraded());
    assert!(!HealthStatus::Healthy.is_unhealthy());

    assert!(!HealthStatus::Degraded.is_healthy());
    assert!(HealthStatus::Degraded.is_degraded());
    assert!(!HealthStatus::Degraded.is_unhealthy());

    assert!(!HealthStatus::Unhealthy.is_healthy());
    assert!(!HealthStatus::Unhealthy.is_degraded());
    assert!(HealthStatus::Unhealthy.is_unhealthy());
}

#[test]
fn test_dependency_health_healthy() {
    let health = DependencyHealth::healthy("database", 5.0);
    assert_eq!(health.name, "database");
    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.latency_ms, Some(5.0));
    assert!(health.message.is_none());
}

#[test]
fn test_dependency_health_degraded() {
    let health = DependencyHealth::degraded("database", "High latency detected");
    assert_eq!(health.status, HealthStatus::Degraded);
    assert!(health.latency_ms.is_none());
    assert_eq!(health.message, Some("High latency detected".to_string()));
}

#[test]
fn test_dependency_health_unhealthy() {
    let health = DependencyHealth::unhealthy("accounts", "Connection refused");
    assert_eq!(health.name, "accounts");
    assert_eq!(health.status, HealthStatus::Unhealthy);
    assert_eq!(health.message, Some("Connection refused".to_string()));
}

#[test]
fn test_aggregated_health_all_healthy() {
    let dependencies = vec![DependencyHealth::healthy("database", 5.0)];
    let health = AggregatedHealth::new("1.0.0".to_string(), 3600, dependencies);

    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.version, "1.0.0");
    assert_eq!(health.uptime_seconds, 3600);
    assert_eq!(health.dependencies.len(), 1);
}

#[test]
fn test_aggregated_health_one_degraded() {
    let dependencies = vec![
        DependencyHealth::healthy("database", 5.0),
        DependencyHealth::degraded("accounts", "Slow"),
    ];
    let health = AggregatedHealth::new("1.0.0".to_string(), 3600, dependencies);

    assert_eq!(health.status, HealthStatus::Degraded);
}

#[test]
fn test_aggregated_health_one_unhealthy() {
    let dependencies = vec![
        DependencyHealth::degraded("database", "Slow"),
        DependencyHealth::unhealthy("accounts", "Down"),
    ];
    let health = AggregatedHealth::new("1.0.0".to_string(), 3600, dependencies);

    assert_eq!(health.status, HealthStatus::Unhealthy);
}

#[test]
fn test_aggregated_health_empty_dependencies() {
    let health = AggregatedHealth::new("1.0.0".to_string(), 0, vec![]);
    assert_eq!(health.status, HealthStatus::Healthy);
    assert!(health.dependencies.is_empty());
}

#[test]
fn test_health_status_serialization() {
    let healthy = serde_json::to_string(&HealthStatus::Healthy).unwrap();
    assert_eq!(healthy, "\"healthy\"");

    let degraded = serde_json::to_string(&HealthStatus::Degraded).unwrap();
    assert_eq!(degraded, "\"degraded\"");

    let unhealthy = serde_json::to_string(&HealthStatus::Unhealthy).unwrap();
    assert_eq!(unhealthy, "\"unhealthy\"");
}

#[test]
fn test_dependency_health_serialization() {
    let health = DependencyHealth::healthy("database", 5.5);
    let json = serde_json::to_string(&health).unwrap();

    assert!(json.contains("\"name\":\"database\""));
    assert!(json.contains("\"status\":\"healthy\""));
    assert!(json.contains("\"latency_ms\":5.5"));
}

#[test]
fn test_aggregated_health_serialization() {
    let dependencies = vec![DependencyHealth::healthy("database", 5.0)];
    let health = AggregatedHealth::new("1.0.0".to_string(), 100, dependencies);
    let json = serde_json::to_string(&health).unwrap();

    assert!(json.contains("\"status\":\"healthy\""));
    assert!(json.contains("\"version\":\"1.0.0\""));
    assert!(json.contains("\"uptime_seconds\":100"));
    assert!(json.contains("\"dependencies\""));
}
