//! Keyboard and mouse shortcuts
//!
//! Bindings map a [`Pattern`] to an action id inside a named context. The
//! engine consumes the same normalized events as the gesture recognizers
//! and returns an [`ActionEvent`] when a pattern completes.

mod chord;
mod engine;

pub use chord::{Chord, IntoPattern, InvalidBindingError, Pattern, Trigger};
pub use engine::{
    ActionEvent, BindingConfig, GLOBAL_CONTEXT, PatternConfig, ShortcutBinding, ShortcutConfig,
    ShortcutEngine,
};
