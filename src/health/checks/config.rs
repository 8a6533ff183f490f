//! Configuration health check

use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::health::check::{CheckResult, Finding, SystemCheck};

/// Checks that every profile loads and carries usable tuning values
pub struct ConfigCheck {
    dir: Option<PathBuf>,
    profiles: Vec<String>,
}

impl ConfigCheck {
    /// Checks the bundled debug and release profiles
    pub fn new() -> Self {
        Self::with_profiles(["debug", "release"])
    }

    pub fn with_profiles<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dir: None,
            profiles: profiles.into_iter().map(Into::into).collect(),
        }
    }

    /// Load from `dir` instead of searching for the config directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    fn load(&self, profile: &str) -> Result<EngineConfig, config::ConfigError> {
        match &self.dir {
            Some(dir) => EngineConfig::load_from(dir, profile),
            None => EngineConfig::load(profile),
        }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanity-check tuning values that parse but cannot work as intended
pub fn validate(config: &EngineConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    let profile = &config.profile;

    let mut non_negative = |name: &str, value: f32| {
        if !value.is_finite() || value < 0.0 {
            findings.push(Finding::fail(format!(
                "'{profile}': {name} must be a finite, non-negative number (got {value})"
            )));
        }
    };
    non_negative("click.radius", config.click.radius);
    non_negative("long_press.tolerance", config.long_press.tolerance);
    non_negative("pan.threshold", config.pan.threshold);
    non_negative("pinch.min_distance", config.pinch.min_distance);
    non_negative("rotate.min_angle", config.rotate.min_angle);
    non_negative("swipe.min_distance", config.swipe.min_distance);
    non_negative("swipe.min_velocity", config.swipe.min_velocity);

    if config.click.timeout_ms == 0 {
        findings.push(Finding::warn(format!(
            "'{profile}': click.timeout_ms is 0, only simultaneous downs can double click"
        )));
    }
    if config.long_press.duration_ms == 0 {
        findings.push(Finding::warn(format!(
            "'{profile}': long_press.duration_ms is 0, every press is a long press"
        )));
    }
    if config.rotate.min_angle >= 360.0 {
        findings.push(Finding::warn(format!(
            "'{profile}': rotate.min_angle of {} needs more than a full turn",
            config.rotate.min_angle
        )));
    }
    if config.shortcuts.sequence_timeout_ms == 0 {
        findings.push(Finding::warn(format!(
            "'{profile}': shortcuts.sequence_timeout_ms is 0, sequences can only complete \
             within a single timestamp"
        )));
    }
    findings
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates profile loading from files and environment")
    }

    fn check(&self) -> CheckResult {
        let mut findings = Vec::new();
        let mut loaded = 0;

        for profile in &self.profiles {
            match self.load(profile) {
                Ok(config) => {
                    loaded += 1;
                    findings.push(Finding::pass(format!(
                        "Profile '{}': loaded ({} bindings, click {}ms/{}px)",
                        profile,
                        config.shortcuts.bindings.len(),
                        config.click.timeout_ms,
                        config.click.radius
                    )));
                    findings.extend(validate(&config));
                }
                Err(e) => {
                    findings.push(Finding::fail(format!("Profile '{profile}': {e}")));
                }
            }
        }

        CheckResult::new(
            format!("{}/{} profiles loaded", loaded, self.profiles.len()),
            findings,
        )
    }
}
