//! Diagnostics for the input engine
//!
//! Each check validates one area and reports a status plus a list of
//! findings. The `input-doctor` binary runs them from the command line and
//! CI can gate on its exit code.
//!
//! # Example
//!
//! ```no_run
//! use unified_input::config::EngineConfig;
//! use unified_input::health::{HealthCheckRunner, checks::*};
//!
//! let config = EngineConfig::load("release").unwrap();
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(BindingsCheck::new(config.shortcuts.clone()))
//!     .add_check(PipelineCheck::new(config))
//!     .run();
//!
//! if report.is_healthy() {
//!     println!("Input engine operational");
//! }
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

use tracing::warn;

pub use check::{CheckResult, CheckStatus, Finding, SystemCheck};
pub use reporter::{format_findings, format_report, print_report};
pub use runner::{HealthCheckReport, HealthCheckRunner};

use crate::config::EngineConfig;

/// Runs every built-in check against `profile` and returns a report
///
/// The bundled debug and release profiles are always loaded. Binding and
/// pipeline checks are skipped when `profile` itself fails to load; the
/// configuration check reports why.
pub fn run_all_checks(profile: &str) -> HealthCheckReport {
    let mut profiles = vec!["debug".to_string(), "release".to_string()];
    if !profiles.iter().any(|p| p == profile) {
        profiles.push(profile.to_string());
    }

    let runner = HealthCheckRunner::new()
        .add_check(checks::BuildInfoCheck::new())
        .add_check(checks::ConfigCheck::with_profiles(profiles));

    let runner = match EngineConfig::load(profile) {
        Ok(config) => runner
            .add_check(checks::BindingsCheck::new(config.shortcuts.clone()))
            .add_check(checks::PipelineCheck::new(config)),
        Err(e) => {
            warn!(profile, error = %e, "skipping binding and pipeline checks");
            runner
        }
    };
    runner.run()
}
