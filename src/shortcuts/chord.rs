//! Chord and pattern parsing
//!
//! A chord is a set of modifiers plus exactly one trigger, either a key or a
//! mouse button. Chords compare by value, so "Shift+Ctrl+h" and
//! "Ctrl+Shift+H" are the same chord and print the same way.
//!
//! A pattern is one chord or an ordered list of chord steps. In a single
//! string, steps are separated by a `+` that has whitespace on both sides:
//! `"A + S + D"` is three steps, `"Ctrl+K"` is one.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::input::{
    DevicePayload, EventKind, InputState, Key, Modifiers, MouseButton, NormalizedInputEvent,
};

/// Rejected binding, reported by [`ShortcutEngine::bind`](super::ShortcutEngine::bind)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBindingError {
    #[error("binding pattern is empty")]
    Empty,

    #[error("pattern `{0}` contains an empty step")]
    EmptyStep(String),

    #[error("chord `{0}` contains an empty token")]
    EmptyToken(String),

    #[error("chord `{0}` has no key or mouse button")]
    NoTrigger(String),

    #[error("chord `{chord}` names more than one key or button")]
    MultipleTriggers { chord: String },

    #[error("unknown key `{token}` in chord `{chord}`")]
    UnknownKey { token: String, chord: String },

    #[error("action id must not be empty")]
    EmptyAction,

    #[error("context name must not be empty")]
    EmptyContext,
}

/// The non-modifier part of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Key(Key),
    Mouse(MouseButton),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Key(key) => f.write_str(key.name()),
            Trigger::Mouse(button) => f.write_str(button.chord_label()),
        }
    }
}

/// Modifiers plus one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub trigger: Trigger,
}

impl Chord {
    pub fn key(modifiers: Modifiers, key: Key) -> Self {
        Self {
            modifiers,
            trigger: Trigger::Key(key),
        }
    }

    pub fn mouse(modifiers: Modifiers, button: MouseButton) -> Self {
        Self {
            modifiers,
            trigger: Trigger::Mouse(button),
        }
    }

    /// Chord pressed by `event`, or `None` when the event cannot take part
    /// in shortcut matching
    ///
    /// Only fresh key downs of non-modifier keys and button downs of mouse
    /// or pen pointers produce a chord. Key ups, auto-repeat, moves, wheel,
    /// touch, button ups and modifier-only key downs return `None`.
    /// Modifiers come from `state`, which already reflects `event`.
    pub fn from_event(event: &NormalizedInputEvent, state: &InputState) -> Option<Self> {
        if event.kind != EventKind::Down {
            return None;
        }
        match &event.payload {
            DevicePayload::Keyboard { key, repeat } => {
                if *repeat || key.is_modifier() {
                    return None;
                }
                Some(Self::key(state.modifiers(), *key))
            }
            DevicePayload::Mouse(sample) | DevicePayload::Pointer { sample, .. } => {
                sample.button.map(|button| Self::mouse(state.modifiers(), button))
            }
            DevicePayload::Touch { .. } | DevicePayload::Wheel { .. } => None,
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in self.modifiers.labels() {
            write!(f, "{label}+")?;
        }
        write!(f, "{}", self.trigger)
    }
}

impl FromStr for Chord {
    type Err = InvalidBindingError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let chord = text.trim();
        if chord.is_empty() {
            return Err(InvalidBindingError::EmptyStep(text.to_string()));
        }

        let mut modifiers = Modifiers::empty();
        let mut trigger = None;
        for token in chord.split('+').map(str::trim) {
            if token.is_empty() {
                return Err(InvalidBindingError::EmptyToken(chord.to_string()));
            }
            if let Some(flag) = Modifiers::from_token(token) {
                modifiers |= flag;
                continue;
            }
            let parsed = match MouseButton::from_token(token) {
                Some(button) => Trigger::Mouse(button),
                None => match Key::from_name(token) {
                    Some(key) => Trigger::Key(key),
                    None => {
                        return Err(InvalidBindingError::UnknownKey {
                            token: token.to_string(),
                            chord: chord.to_string(),
                        });
                    }
                },
            };
            if trigger.replace(parsed).is_some() {
                return Err(InvalidBindingError::MultipleTriggers {
                    chord: chord.to_string(),
                });
            }
        }

        match trigger {
            Some(trigger) => Ok(Self { modifiers, trigger }),
            None => Err(InvalidBindingError::NoTrigger(chord.to_string())),
        }
    }
}

/// One chord or an ordered sequence of chords
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    steps: Vec<Chord>,
}

impl Pattern {
    pub fn new(steps: Vec<Chord>) -> Result<Self, InvalidBindingError> {
        if steps.is_empty() {
            return Err(InvalidBindingError::Empty);
        }
        Ok(Self { steps })
    }

    /// Parse each string as exactly one step
    pub fn from_steps<S: AsRef<str>>(steps: &[S]) -> Result<Self, InvalidBindingError> {
        let chords = steps
            .iter()
            .map(|step| step.as_ref().parse())
            .collect::<Result<Vec<Chord>, _>>()?;
        Self::new(chords)
    }

    pub fn steps(&self) -> &[Chord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_sequence(&self) -> bool {
        self.steps.len() > 1
    }

    /// True when `prefix` is a strict prefix of this pattern
    pub fn continues(&self, prefix: &[Chord]) -> bool {
        self.steps.len() > prefix.len() && self.steps.starts_with(prefix)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromStr for Pattern {
    type Err = InvalidBindingError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.trim().is_empty() {
            return Err(InvalidBindingError::Empty);
        }
        let steps = split_steps(text);
        if steps.iter().any(String::is_empty) {
            return Err(InvalidBindingError::EmptyStep(text.to_string()));
        }
        Self::from_steps(&steps)
    }
}

/// Split on `+` tokens standing alone between whitespace
fn split_steps(text: &str) -> Vec<String> {
    let mut steps = vec![String::new()];
    for token in text.split_whitespace() {
        if token == "+" {
            steps.push(String::new());
        } else if let Some(step) = steps.last_mut() {
            step.push_str(token);
        }
    }
    steps
}

/// Values accepted wherever a binding pattern is expected
pub trait IntoPattern {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError>;
}

impl IntoPattern for Pattern {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        Ok(self)
    }
}

impl IntoPattern for Chord {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        Pattern::new(vec![self])
    }
}

impl IntoPattern for &str {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        self.parse()
    }
}

impl IntoPattern for &String {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        self.parse()
    }
}

impl IntoPattern for String {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        self.parse()
    }
}

impl<S: AsRef<str>> IntoPattern for &[S] {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        Pattern::from_steps(self)
    }
}

impl<S: AsRef<str>, const N: usize> IntoPattern for [S; N] {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        Pattern::from_steps(&self)
    }
}

impl<S: AsRef<str>> IntoPattern for Vec<S> {
    fn into_pattern(self) -> Result<Pattern, InvalidBindingError> {
        Pattern::from_steps(&self)
    }
}
