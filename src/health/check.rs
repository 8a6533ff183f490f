//! Core check trait and result types

use std::time::Duration;

use colored::Colorize;

/// Outcome of a check or of one finding inside it
///
/// Ordered by severity so the worst of several statuses is their `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    /// Returns true if the check passed (Pass or Warn)
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Pass | CheckStatus::Warn)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    /// Returns the status as a colored string
    pub fn as_colored_str(&self) -> String {
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }

    /// One-character marker used in finding lists
    pub fn marker(&self) -> String {
        match self {
            CheckStatus::Pass => "✓".green().to_string(),
            CheckStatus::Warn => "⚠".yellow().to_string(),
            CheckStatus::Fail => "✗".red().to_string(),
        }
    }
}

/// A single observation made by a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub status: CheckStatus,
    pub text: String,
}

impl Finding {
    pub fn pass(text: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            text: text.into(),
        }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warn,
            text: text.into(),
        }
    }

    pub fn fail(text: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            text: text.into(),
        }
    }
}

/// Result of a check
///
/// The status is the worst status among the findings; a check without
/// findings passes.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// One-line summary shown in the report table
    pub message: String,
    pub findings: Vec<Finding>,
    /// How long the check took
    pub duration: Duration,
}

impl CheckResult {
    pub fn new(message: impl Into<String>, findings: Vec<Finding>) -> Self {
        let status = findings
            .iter()
            .map(|f| f.status)
            .max()
            .unwrap_or(CheckStatus::Pass);
        Self {
            status,
            message: message.into(),
            findings,
            duration: Duration::ZERO,
        }
    }

    /// A failing result with a single finding explaining why
    pub fn fail(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(message.clone(), vec![Finding::fail(message)])
    }

    /// Sets the duration for this check
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Findings at or above `status`
    pub fn findings_at_least(&self, status: CheckStatus) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.status >= status)
    }
}

/// Trait for engine diagnostics
pub trait SystemCheck {
    /// Name of the area being checked
    fn name(&self) -> &'static str;

    /// Perform the check
    fn check(&self) -> CheckResult;

    /// Optional description of what this check validates
    fn description(&self) -> Option<&'static str> {
        None
    }
}
