//! Build information health check

use crate::build_info;
use crate::health::check::{CheckResult, Finding, SystemCheck};

/// Checks that build information is accessible and valid
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates build metadata (version, rustc, target)")
    }

    fn check(&self) -> CheckResult {
        let findings = build_info::fields()
            .into_iter()
            .map(|(label, value)| {
                if value.trim().is_empty() {
                    Finding::fail(format!("{label}: missing"))
                } else {
                    Finding::pass(format!("{label}: {value}"))
                }
            })
            .collect();

        CheckResult::new(build_info::version_string(), findings)
    }
}
