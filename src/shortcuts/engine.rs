//! Context-scoped chord and sequence matcher

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::chord::{Chord, IntoPattern, InvalidBindingError, Pattern};
use crate::input::{InputState, NormalizedInputEvent};

/// Context whose bindings apply whatever the active context is
pub const GLOBAL_CONTEXT: &str = "global";

/// A pattern in a binding file: one string, or one string per step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternConfig {
    Single(String),
    Steps(Vec<String>),
}

impl IntoPattern for &PatternConfig {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        match self {
            PatternConfig::Single(text) => text.into_pattern(),
            PatternConfig::Steps(steps) => Pattern::from_steps(steps),
        }
    }
}

fn global_context() -> String {
    GLOBAL_CONTEXT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub action: String,
    pub pattern: PatternConfig,
    #[serde(default = "global_context")]
    pub context: String,
}

/// Shortcut tuning and the bindings to install at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutConfig {
    /// Max gap between two accepted steps of a sequence
    pub sequence_timeout_ms: u64,
    pub bindings: Vec<BindingConfig>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            sequence_timeout_ms: 1000,
            bindings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutBinding {
    pub pattern: Pattern,
    pub action_id: String,
    pub context: String,
}

/// A fired binding
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub action_id: String,
    /// Context the binding was registered in
    pub context: String,
    /// Event that completed the pattern
    pub trigger: NormalizedInputEvent,
}

/// Steps of a sequence accepted so far
#[derive(Debug, Clone)]
struct SequenceProgress {
    prefix: Vec<Chord>,
    last_step: Duration,
}

enum Lookup<'a> {
    Complete(&'a ShortcutBinding),
    Partial,
    Miss,
}

/// Matches chords and chord sequences against bindings grouped by context
///
/// Only the active context and [`GLOBAL_CONTEXT`] are searched, active
/// first. A candidate that equals a binding's full pattern fires at once,
/// even when a longer binding shares it as a prefix.
#[derive(Debug, Clone)]
pub struct ShortcutEngine {
    bindings: IndexMap<String, Vec<ShortcutBinding>>,
    context: String,
    sequence_timeout: Duration,
    progress: Option<SequenceProgress>,
}

impl ShortcutEngine {
    pub fn new(sequence_timeout: Duration) -> Self {
        Self {
            bindings: IndexMap::new(),
            context: global_context(),
            sequence_timeout,
            progress: None,
        }
    }

    /// Build an engine and install every configured binding
    pub fn from_config(config: &ShortcutConfig) -> Result<Self, InvalidBindingError> {
        let mut engine = Self::new(Duration::from_millis(config.sequence_timeout_ms));
        for binding in &config.bindings {
            engine.bind(&binding.pattern, &binding.action, &binding.context)?;
        }
        Ok(engine)
    }

    /// Register `pattern` to fire `action_id` while `context` is active
    ///
    /// Registering the same pattern and action twice in one context is a
    /// no-op.
    pub fn bind(
        &mut self,
        pattern: impl IntoPattern,
        action_id: &str,
        context: &str,
    ) -> Result<(), InvalidBindingError> {
        if action_id.trim().is_empty() {
            return Err(InvalidBindingError::EmptyAction);
        }
        if context.trim().is_empty() {
            return Err(InvalidBindingError::EmptyContext);
        }
        let pattern = pattern.into_pattern()?;

        let bindings = self.bindings.entry(context.to_string()).or_default();
        if bindings
            .iter()
            .any(|b| b.action_id == action_id && b.pattern == pattern)
        {
            return Ok(());
        }
        debug!(%pattern, action = action_id, context, "shortcut bound");
        bindings.push(ShortcutBinding {
            pattern,
            action_id: action_id.to_string(),
            context: context.to_string(),
        });
        Ok(())
    }

    /// Remove every binding of `action_id` in `context`, returning how many
    /// were removed
    pub fn unbind(&mut self, action_id: &str, context: &str) -> usize {
        let Some(bindings) = self.bindings.get_mut(context) else {
            return 0;
        };
        let before = bindings.len();
        bindings.retain(|b| b.action_id != action_id);
        let removed = before - bindings.len();
        if removed > 0 {
            debug!(action = action_id, context, removed, "shortcut unbound");
            // A pending prefix may belong to the removed binding
            self.progress = None;
        }
        removed
    }

    /// Switch the active context, abandoning any partial sequence
    ///
    /// Setting the context that is already active keeps the sequence.
    pub fn set_context(&mut self, context: &str) {
        if self.context == context {
            return;
        }
        debug!(from = %self.context, to = context, "shortcut context changed");
        self.context = context.to_string();
        self.reset();
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn sequence_timeout(&self) -> Duration {
        self.sequence_timeout
    }

    pub fn set_sequence_timeout(&mut self, timeout: Duration) {
        self.sequence_timeout = timeout;
    }

    /// Bindings registered in `context`, in registration order
    pub fn bindings(&self, context: &str) -> &[ShortcutBinding] {
        self.bindings
            .get(context)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every binding, grouped by context in the order contexts were first used
    pub fn all_bindings(&self) -> impl Iterator<Item = &ShortcutBinding> {
        self.bindings.values().flatten()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Number of sequence steps accepted so far
    pub fn pending_steps(&self) -> usize {
        self.progress.as_ref().map_or(0, |p| p.prefix.len())
    }

    /// When the pending sequence expires, if one is pending
    pub fn next_deadline(&self) -> Option<Duration> {
        self.progress
            .as_ref()
            .map(|p| p.last_step + self.sequence_timeout)
    }

    /// Drop any partial sequence
    pub fn reset(&mut self) {
        if self.progress.take().is_some() {
            trace!("shortcut sequence reset");
        }
    }

    /// Expire a partial sequence whose last step is older than the timeout
    pub fn poll(&mut self, now: Duration) {
        if let Some(progress) = &self.progress
            && now.saturating_sub(progress.last_step) > self.sequence_timeout
        {
            debug!(steps = progress.prefix.len(), "shortcut sequence timed out");
            self.progress = None;
        }
    }

    /// Match one event, returning the action it completes
    ///
    /// `state` must already reflect `event`. Events that cannot form a
    /// chord (see [`Chord::from_event`]) pass through without touching
    /// sequence progress.
    pub fn process(
        &mut self,
        event: &NormalizedInputEvent,
        state: &InputState,
    ) -> Option<ActionEvent> {
        let chord = Chord::from_event(event, state)?;
        let now = event.timestamp;
        self.poll(now);

        let prefix = self.progress.take().map(|p| p.prefix).unwrap_or_default();
        let retry = !prefix.is_empty();

        let mut candidate = prefix;
        candidate.push(chord);
        if let Some(action) = self.advance(&candidate, event) {
            return action;
        }

        // A dead-end continuation gets a fresh attempt as the first step
        if retry {
            trace!(%chord, "sequence broken, retrying from first step");
            if let Some(action) = self.advance(&[chord], event) {
                return action;
            }
        }
        trace!(%chord, context = %self.context, "no shortcut matched");
        None
    }

    /// Try `candidate` against the bindings; `None` on a total miss
    fn advance(
        &mut self,
        candidate: &[Chord],
        event: &NormalizedInputEvent,
    ) -> Option<Option<ActionEvent>> {
        match self.lookup(candidate) {
            Lookup::Complete(binding) => {
                debug!(
                    action = %binding.action_id,
                    context = %binding.context,
                    pattern = %binding.pattern,
                    "shortcut fired"
                );
                let action = ActionEvent {
                    action_id: binding.action_id.clone(),
                    context: binding.context.clone(),
                    trigger: event.clone(),
                };
                self.progress = None;
                Some(Some(action))
            }
            Lookup::Partial => {
                trace!(steps = candidate.len(), "shortcut sequence advanced");
                self.progress = Some(SequenceProgress {
                    prefix: candidate.to_vec(),
                    last_step: event.timestamp,
                });
                Some(None)
            }
            Lookup::Miss => None,
        }
    }

    fn lookup(&self, candidate: &[Chord]) -> Lookup<'_> {
        if let Some(binding) = self
            .searched_bindings()
            .find(|b| b.pattern.steps() == candidate)
        {
            return Lookup::Complete(binding);
        }
        if self
            .searched_bindings()
            .any(|b| b.pattern.continues(candidate))
        {
            return Lookup::Partial;
        }
        Lookup::Miss
    }

    fn searched_bindings(&self) -> impl Iterator<Item = &ShortcutBinding> {
        let active = self.bindings(&self.context);
        let global = if self.context == GLOBAL_CONTEXT {
            &[][..]
        } else {
            self.bindings(GLOBAL_CONTEXT)
        };
        active.iter().chain(global)
    }
}

impl Default for ShortcutEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(ShortcutConfig::default().sequence_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::input::{
        Buttons, DevicePayload, EventKind, Key, Modifiers, MouseButton, PointerId, PointerSample,
    };

    /// Drives an engine with key presses the way the pipeline does
    struct Keyboard {
        state: InputState,
        engine: ShortcutEngine,
    }

    impl Keyboard {
        fn new() -> Self {
            Self {
                state: InputState::new(),
                engine: ShortcutEngine::new(Duration::from_millis(1000)),
            }
        }

        fn send(
            &mut self,
            kind: EventKind,
            key: Key,
            repeat: bool,
            ms: u64,
        ) -> Option<ActionEvent> {
            let event = NormalizedInputEvent {
                kind,
                timestamp: Duration::from_millis(ms),
                modifiers: Modifiers::empty(),
                payload: DevicePayload::Keyboard { key, repeat },
            };
            self.state.update(&event);
            self.engine.process(&event, &self.state)
        }

        /// Press and release `key` while holding `mods`
        fn tap(&mut self, mods: &[Key], key: Key, ms: u64) -> Option<String> {
            for m in mods {
                self.send(EventKind::Down, *m, false, ms);
            }
            let fired = self.send(EventKind::Down, key, false, ms);
            self.send(EventKind::Up, key, false, ms);
            for m in mods {
                self.send(EventKind::Up, *m, false, ms);
            }
            fired.map(|a| a.action_id)
        }
    }

    #[test]
    fn test_single_chord_fires() {
        let mut kb = Keyboard::new();
        kb.engine.bind("Ctrl+Shift+H", "help", GLOBAL_CONTEXT).unwrap();
        assert_eq!(kb.tap(&[Key::Control, Key::Shift], Key::H, 0).as_deref(), Some("help"));
        assert_eq!(kb.tap(&[Key::Control], Key::H, 10), None);
    }

    #[test]
    fn test_sequence_within_timeout_fires_once() {
        let mut kb = Keyboard::new();
        kb.engine.bind(["Ctrl+K", "Ctrl+C"], "comment", GLOBAL_CONTEXT).unwrap();

        assert_eq!(kb.tap(&[Key::Control], Key::K, 0), None);
        assert_eq!(kb.engine.pending_steps(), 1);
        assert_eq!(kb.tap(&[Key::Control], Key::C, 900).as_deref(), Some("comment"));
        assert_eq!(kb.engine.pending_steps(), 0);
        assert_eq!(kb.tap(&[Key::Control], Key::C, 950), None);
    }

    #[test]
    fn test_sequence_gap_beyond_timeout_restarts() {
        let mut kb = Keyboard::new();
        kb.engine.bind(["Ctrl+K", "Ctrl+C"], "comment", GLOBAL_CONTEXT).unwrap();

        kb.tap(&[Key::Control], Key::K, 0);
        assert_eq!(kb.tap(&[Key::Control], Key::C, 1200), None);
        assert_eq!(kb.engine.pending_steps(), 0);
    }

    #[test]
    fn test_poll_expires_pending_sequence() {
        let mut kb = Keyboard::new();
        kb.engine.bind("A + S + D", "asd", GLOBAL_CONTEXT).unwrap();
        kb.tap(&[], Key::A, 0);
        kb.tap(&[], Key::S, 100);
        assert_eq!(kb.engine.next_deadline(), Some(Duration::from_millis(1100)));

        kb.engine.poll(Duration::from_millis(1100));
        assert_eq!(kb.engine.pending_steps(), 2);
        kb.engine.poll(Duration::from_millis(1101));
        assert_eq!(kb.engine.pending_steps(), 0);
    }

    #[test]
    fn test_context_switch_abandons_sequence() {
        let mut kb = Keyboard::new();
        kb.engine.bind(["Ctrl+K", "Ctrl+C"], "comment", "editor").unwrap();
        kb.engine.set_context("editor");

        kb.tap(&[Key::Control], Key::K, 0);
        kb.engine.set_context("viewer");
        kb.engine.set_context("editor");
        assert_eq!(kb.tap(&[Key::Control], Key::C, 100), None);
    }

    #[test]
    fn test_same_context_keeps_sequence() {
        let mut kb = Keyboard::new();
        kb.engine.bind(["Ctrl+K", "Ctrl+C"], "comment", "editor").unwrap();
        kb.engine.set_context("editor");
        kb.tap(&[Key::Control], Key::K, 0);
        kb.engine.set_context("editor");
        assert_eq!(kb.tap(&[Key::Control], Key::C, 100).as_deref(), Some("comment"));
    }

    #[test]
    fn test_modifier_only_and_repeat_are_transparent() {
        let mut kb = Keyboard::new();
        kb.engine.bind("A + S", "as", GLOBAL_CONTEXT).unwrap();

        kb.tap(&[], Key::A, 0);
        kb.send(EventKind::Down, Key::A, true, 10);
        kb.send(EventKind::Down, Key::Shift, false, 20);
        kb.send(EventKind::Up, Key::Shift, false, 30);
        assert_eq!(kb.engine.pending_steps(), 1);
        assert_eq!(kb.tap(&[], Key::S, 40).as_deref(), Some("as"));
    }

    #[test]
    fn test_broken_sequence_retries_from_first_step() {
        let mut kb = Keyboard::new();
        kb.engine.bind("A + S", "as", GLOBAL_CONTEXT).unwrap();
        kb.engine.bind("X", "x", GLOBAL_CONTEXT).unwrap();

        kb.tap(&[], Key::A, 0);
        assert_eq!(kb.tap(&[], Key::X, 10).as_deref(), Some("x"));

        kb.tap(&[], Key::A, 20);
        kb.tap(&[], Key::A, 30);
        assert_eq!(kb.engine.pending_steps(), 1);
        assert_eq!(kb.tap(&[], Key::S, 40).as_deref(), Some("as"));
    }

    #[test]
    fn test_total_miss_resets() {
        let mut kb = Keyboard::new();
        kb.engine.bind("A + S", "as", GLOBAL_CONTEXT).unwrap();
        kb.tap(&[], Key::A, 0);
        kb.tap(&[], Key::Q, 10);
        assert_eq!(kb.engine.pending_steps(), 0);
        assert_eq!(kb.tap(&[], Key::S, 20), None);
    }

    #[test]
    fn test_active_context_before_global() {
        let mut kb = Keyboard::new();
        kb.engine.bind("Ctrl+S", "save-all", GLOBAL_CONTEXT).unwrap();
        kb.engine.bind("Ctrl+S", "save-file", "editor").unwrap();

        assert_eq!(kb.tap(&[Key::Control], Key::S, 0).as_deref(), Some("save-all"));
        kb.engine.set_context("editor");
        assert_eq!(kb.tap(&[Key::Control], Key::S, 10).as_deref(), Some("save-file"));
        kb.engine.set_context("viewer");
        assert_eq!(kb.tap(&[Key::Control], Key::S, 20).as_deref(), Some("save-all"));
    }

    #[test]
    fn test_inactive_context_is_ignored() {
        let mut kb = Keyboard::new();
        kb.engine.bind("Delete", "erase", "canvas").unwrap();
        assert_eq!(kb.tap(&[], Key::Delete, 0), None);
    }

    #[test]
    fn test_mouse_chord_uses_same_matcher() {
        let mut engine = ShortcutEngine::default();
        engine.bind("Ctrl+LeftClick", "add-to-selection", GLOBAL_CONTEXT).unwrap();
        let mut state = InputState::new();

        let click = |modifiers| NormalizedInputEvent {
            kind: EventKind::Down,
            timestamp: Duration::ZERO,
            modifiers,
            payload: DevicePayload::Mouse(PointerSample {
                pointer_id: PointerId::MOUSE,
                position: Vec2::new(4.0, 4.0),
                buttons: Buttons::LEFT,
                button: Some(MouseButton::Left),
            }),
        };

        let plain = click(Modifiers::empty());
        state.update(&plain);
        assert_eq!(engine.process(&plain, &state), None);

        let with_ctrl = click(Modifiers::CTRL);
        state.update(&with_ctrl);
        let action = engine.process(&with_ctrl, &state).unwrap();
        assert_eq!(action.action_id, "add-to-selection");
        assert_eq!(action.context, GLOBAL_CONTEXT);
        assert_eq!(action.trigger, with_ctrl);
    }

    #[test]
    fn test_bind_rejects_invalid_input() {
        let mut engine = ShortcutEngine::default();
        assert_eq!(engine.bind("", "a", GLOBAL_CONTEXT), Err(InvalidBindingError::Empty));
        assert_eq!(engine.bind("A", " ", GLOBAL_CONTEXT), Err(InvalidBindingError::EmptyAction));
        assert_eq!(engine.bind("A", "a", ""), Err(InvalidBindingError::EmptyContext));
        assert_eq!(engine.binding_count(), 0);
    }

    #[test]
    fn test_duplicate_bind_and_unbind() {
        let mut engine = ShortcutEngine::default();
        engine.bind("Ctrl+Z", "undo", GLOBAL_CONTEXT).unwrap();
        engine.bind("ctrl+z", "undo", GLOBAL_CONTEXT).unwrap();
        engine.bind("Meta+Z", "undo", GLOBAL_CONTEXT).unwrap();
        assert_eq!(engine.binding_count(), 2);

        assert_eq!(engine.unbind("undo", "editor"), 0);
        assert_eq!(engine.unbind("undo", GLOBAL_CONTEXT), 2);
        assert!(engine.bindings(GLOBAL_CONTEXT).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = ShortcutConfig {
            sequence_timeout_ms: 500,
            bindings: vec![
                BindingConfig {
                    action: "save".into(),
                    pattern: PatternConfig::Single("Ctrl+S".into()),
                    context: GLOBAL_CONTEXT.into(),
                },
                BindingConfig {
                    action: "comment".into(),
                    pattern: PatternConfig::Steps(vec!["Ctrl+K".into(), "Ctrl+C".into()]),
                    context: "editor".into(),
                },
            ],
        };
        let engine = ShortcutEngine::from_config(&config).unwrap();
        assert_eq!(engine.sequence_timeout(), Duration::from_millis(500));
        assert_eq!(engine.bindings("editor")[0].pattern.len(), 2);

        let broken = ShortcutConfig {
            bindings: vec![BindingConfig {
                action: "oops".into(),
                pattern: PatternConfig::Single("Ctrl+Nope".into()),
                context: GLOBAL_CONTEXT.into(),
            }],
            ..ShortcutConfig::default()
        };
        assert!(matches!(
            ShortcutEngine::from_config(&broken),
            Err(InvalidBindingError::UnknownKey { .. })
        ));
    }
}
