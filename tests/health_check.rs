//! Integration tests for the health check system

use unified_input::config::EngineConfig;
use unified_input::health::{self, CheckStatus, HealthCheckRunner, SystemCheck, checks::*};

#[test]
fn test_all_health_checks() {
    let report = health::run_all_checks("debug");

    // Print report for debugging if tests fail
    if !report.is_healthy() || report.has_warnings() {
        eprintln!("\n{}", health::format_report(&report));
        eprintln!("{}", health::format_findings(&report, false));
    }

    assert!(
        report.is_healthy(),
        "Health checks failed: {} failures, {} warnings",
        report.failed,
        report.warned
    );
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.total, 4);
}

#[test]
fn test_unknown_profile_falls_back_to_defaults() {
    let report = health::run_all_checks("does-not-exist");
    assert!(report.is_healthy());
    let config = report.result("Configuration").unwrap();
    assert_eq!(config.message, "3/3 profiles loaded");
}

#[test]
fn test_config_check() {
    let result = ConfigCheck::new().check();
    assert!(
        result.status.is_ok(),
        "Config check failed: {}",
        result.message
    );
}

#[test]
fn test_bindings_check() {
    let config = EngineConfig::load("release").unwrap();
    let result = BindingsCheck::new(config.shortcuts).check();
    assert_eq!(
        result.status,
        CheckStatus::Pass,
        "Bindings check: {:?}",
        result.findings
    );
}

#[test]
fn test_pipeline_check() {
    let config = EngineConfig::load("debug").unwrap();
    let bindings = config.shortcuts.bindings.len();
    let result = PipelineCheck::new(config).check();
    assert_eq!(
        result.status,
        CheckStatus::Pass,
        "Pipeline check: {:?}",
        result.findings
    );
    assert_eq!(
        result.message,
        format!("6/6 gestures, {bindings}/{bindings} shortcuts")
    );
}

#[test]
fn test_build_info_check() {
    let result = BuildInfoCheck::new().check();
    assert!(
        result.status.is_ok(),
        "Build info check failed: {}",
        result.message
    );
}

#[test]
fn test_runner_collects_all_checks() {
    let report = HealthCheckRunner::new()
        .add_check(ConfigCheck::new())
        .add_check(BuildInfoCheck::new())
        .run();

    assert_eq!(report.total, 2, "Expected 2 checks in report");
    assert_eq!(report.passed + report.warned + report.failed, report.total);
    assert!(report.result("Build Info").is_some());
}

#[test]
fn test_report_formatting() {
    let report = HealthCheckRunner::new()
        .add_check(BuildInfoCheck::new())
        .run();
    let formatted = health::format_report(&report);
    assert!(formatted.contains("Build Info"));
    assert!(formatted.contains("Summary"));

    // Passing findings only appear in verbose mode
    assert!(health::format_findings(&report, false).is_empty());
    assert!(health::format_findings(&report, true).contains("Rustc"));
}
