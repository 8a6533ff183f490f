//! Unified Input
//!
//! Turns raw keyboard, mouse, pen, touch and wheel events into one
//! normalized stream, recognizes gestures on top of it and matches
//! keyboard/mouse shortcuts.

/// Build-time information (version, target, compiler)
pub mod build_info;

/// Engine configuration profiles
pub mod config;

/// Click, long-press, pan, pinch, rotate and swipe recognizers
pub mod gesture;

/// Diagnostics run by `input-doctor`
pub mod health;

/// Raw events, normalization, input state and the dispatch pipeline
pub mod input;

/// Chord and sequence shortcut matching
pub mod shortcuts;
