//! Input normalization and dispatch
//!
//! Provides one canonical event stream over keyboard, mouse, pen, touch and
//! wheel input:
//! - Normalizes raw platform events against a reference surface
//! - Maintains a single running [`InputState`]
//! - Drives attached recognizers and the shortcut engine in a fixed order
//! - Models timers as explicit deadlines against an injectable clock
//!
//! # Architecture
//!
//! ```text
//! Raw Input (winit / host) → InputCollector → RawEvent
//!                                                ↓
//!                                          normalize_event
//!                                                ↓
//!                                     InputState::update
//!                                                ↓
//!                               Recognizers (attach order)
//!                                                ↓
//!                                         ShortcutEngine
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let config = EngineConfig::load("release")?;
//! let mut pipeline = InputPipeline::from_config(&config, MonotonicClock::new())?;
//!
//! // In window_event()
//! if let Some(raw) = collector.handle_window_event(&event, pipeline.now()) {
//!     pipeline.dispatch(&raw, &collector);
//! }
//!
//! // Each frame
//! pipeline.tick();
//! for (id, gesture) in pipeline.take_gestures() { /* ... */ }
//! for action in pipeline.take_actions() { /* ... */ }
//! ```

mod clock;
mod collector;
mod events;
mod handler;
mod keys;
mod normalize;
mod pipeline;
mod raw;
mod state;

// Re-export public API
pub use clock::{Clock, Deadline, ManualClock, MonotonicClock, SessionId};
pub use collector::InputCollector;
pub use events::{
    DeviceKind, DevicePayload, EventKind, NormalizedInputEvent, PenData, PointerId,
    PointerSample, TouchPoint,
};
pub use handler::Recognizer;
pub use keys::{Buttons, Key, Modifiers, MouseButton};
pub use normalize::{LINE_DELTA_PX, normalize_event};
pub use pipeline::{EngineError, InputPipeline, RecognizerId};
pub use raw::{
    DeltaMode, PointerType, RawEvent, RawKeyEvent, RawKeyPhase, RawMouseEvent, RawPhase,
    RawPointerEvent, RawTouch, RawTouchEvent, RawWheelEvent, Rect, Surface,
};
pub use state::{InputState, PointerState};
