//! Raw platform events and the reference surface
//!
//! These types describe input the way hosts report it: client-space
//! coordinates, DOM-style button masks and key names. The normalizer turns
//! them into [`NormalizedInputEvent`](super::NormalizedInputEvent)s.

use std::time::Duration;

use glam::Vec2;

use super::keys::Modifiers;

/// Rectangular area in client space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }

    /// Get the center point of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Top-left corner
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// The element input coordinates are made relative to
pub trait Surface {
    /// Bounding box in client space
    fn bounds(&self) -> Rect;

    /// Physical-to-logical pixel ratio
    fn scale_factor(&self) -> f32 {
        1.0
    }
}

impl Surface for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Phase reported by a raw pointing-device event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPhase {
    Down,
    Up,
    Move,
    Cancel,
}

/// Phase reported by a raw keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKeyPhase {
    Down,
    Up,
}

/// Kind of device behind a raw pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerType {
    Mouse,
    Pen,
    Touch,
}

/// Units of a raw wheel delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Raw keyboard event
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyEvent {
    pub phase: RawKeyPhase,
    /// Logical key value or physical code ("k", "KeyK", "Control")
    pub key: String,
    pub repeat: bool,
    pub modifiers: Modifiers,
    pub timestamp: Duration,
}

/// Raw mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct RawMouseEvent {
    pub phase: RawPhase,
    /// Client-space position
    pub client: Vec2,
    /// Index of the button that changed (DOM `button`)
    pub button: i16,
    /// Bitmask of held buttons (DOM `buttons`)
    pub buttons: u16,
    pub modifiers: Modifiers,
    pub timestamp: Duration,
}

/// Raw pointer event (mouse, pen or touch through the pointer API)
#[derive(Debug, Clone, PartialEq)]
pub struct RawPointerEvent {
    pub phase: RawPhase,
    pub pointer_id: i64,
    pub pointer_type: PointerType,
    pub client: Vec2,
    pub button: i16,
    pub buttons: u16,
    pub pressure: f32,
    pub tilt: Vec2,
    pub modifiers: Modifiers,
    pub timestamp: Duration,
}

/// One contact inside a raw touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTouch {
    pub identifier: i64,
    pub client: Vec2,
}

/// Raw touch event
#[derive(Debug, Clone, PartialEq)]
pub struct RawTouchEvent {
    pub phase: RawPhase,
    /// Contacts that changed with this event
    pub changed: Vec<RawTouch>,
    /// Contacts still on the surface
    pub touches: Vec<RawTouch>,
    pub modifiers: Modifiers,
    pub timestamp: Duration,
}

/// Raw wheel event
#[derive(Debug, Clone, PartialEq)]
pub struct RawWheelEvent {
    pub client: Vec2,
    pub delta: Vec2,
    pub mode: DeltaMode,
    pub modifiers: Modifiers,
    pub timestamp: Duration,
}

/// Any event a host can forward
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    Key(RawKeyEvent),
    Mouse(RawMouseEvent),
    Pointer(RawPointerEvent),
    Touch(RawTouchEvent),
    Wheel(RawWheelEvent),
    /// Anything else the host saw (focus, gamepad, drag-and-drop ...)
    Unsupported(String),
}

impl RawEvent {
    /// Host timestamp, when the event kind carries one
    pub fn timestamp(&self) -> Option<Duration> {
        match self {
            Self::Key(e) => Some(e.timestamp),
            Self::Mouse(e) => Some(e.timestamp),
            Self::Pointer(e) => Some(e.timestamp),
            Self::Touch(e) => Some(e.timestamp),
            Self::Wheel(e) => Some(e.timestamp),
            Self::Unsupported(_) => None,
        }
    }
}
