//! Shortcut binding table health check

use crate::health::check::{CheckResult, Finding, SystemCheck};
use crate::shortcuts::{GLOBAL_CONTEXT, ShortcutBinding, ShortcutConfig, ShortcutEngine};

/// Checks that configured bindings parse and can all be reached
///
/// A binding is unreachable when another binding searched alongside it
/// has the same pattern, or matches one of its leading steps: the shorter
/// pattern fires first and the sequence never advances past it.
pub struct BindingsCheck {
    config: ShortcutConfig,
}

impl BindingsCheck {
    pub fn new(config: ShortcutConfig) -> Self {
        Self { config }
    }
}

/// Two contexts whose bindings are searched together at some point
fn overlapping(a: &str, b: &str) -> bool {
    a == b || a == GLOBAL_CONTEXT || b == GLOBAL_CONTEXT
}

/// Describe why `hidden` can never fire because of `winner`, if it cannot
fn shadowing(winner: &ShortcutBinding, hidden: &ShortcutBinding) -> Option<String> {
    if !overlapping(&winner.context, &hidden.context) {
        return None;
    }
    if winner.pattern == hidden.pattern && winner.action_id != hidden.action_id {
        return Some(format!(
            "`{}` is bound to both '{}' ({}) and '{}' ({})",
            hidden.pattern, winner.action_id, winner.context, hidden.action_id, hidden.context
        ));
    }
    if hidden.pattern.continues(winner.pattern.steps()) {
        return Some(format!(
            "'{}' ({}, `{}`) is shadowed by '{}' ({}, `{}`)",
            hidden.action_id,
            hidden.context,
            hidden.pattern,
            winner.action_id,
            winner.context,
            winner.pattern
        ));
    }
    None
}

/// Every reachability problem in `engine`, one line per hidden binding
pub fn conflicts(engine: &ShortcutEngine) -> Vec<String> {
    let bindings: Vec<&ShortcutBinding> = engine.all_bindings().collect();
    let mut problems = Vec::new();
    for (i, hidden) in bindings.iter().enumerate() {
        for (j, winner) in bindings.iter().enumerate() {
            // Identical patterns: report once, against the earlier binding
            let same_pattern = winner.pattern == hidden.pattern;
            if i == j || (same_pattern && j > i) {
                continue;
            }
            if let Some(problem) = shadowing(winner, hidden) {
                problems.push(problem);
            }
        }
    }
    problems
}

impl SystemCheck for BindingsCheck {
    fn name(&self) -> &'static str {
        "Shortcut Bindings"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates binding patterns and finds unreachable bindings")
    }

    fn check(&self) -> CheckResult {
        let engine = match ShortcutEngine::from_config(&self.config) {
            Ok(engine) => engine,
            Err(e) => return CheckResult::fail(format!("Invalid binding: {e}")),
        };

        let mut findings: Vec<Finding> = engine
            .all_bindings()
            .map(|b| Finding::pass(format!("'{}' ({}): `{}`", b.action_id, b.context, b.pattern)))
            .collect();
        findings.extend(conflicts(&engine).into_iter().map(Finding::warn));

        let contexts: std::collections::BTreeSet<&str> =
            engine.all_bindings().map(|b| b.context.as_str()).collect();
        CheckResult::new(
            format!(
                "{} bindings in {} contexts",
                engine.binding_count(),
                contexts.len()
            ),
            findings,
        )
    }
}
