//! Canonical input events

use std::time::Duration;

use glam::Vec2;

use super::keys::{Buttons, Key, Modifiers, MouseButton};

/// Identifier of a physical pointer (mouse, pen or touch contact)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i64);

impl PointerId {
    /// Pointer id used for plain mouse events, matching the DOM convention
    pub const MOUSE: PointerId = PointerId(1);
}

/// Phase of an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Down,
    Up,
    Move,
    Cancel,
    Wheel,
}

/// Device class that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Pointer,
    Touch,
    Wheel,
}

/// Pointing-device sample shared by mouse and pointer events
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSample {
    pub pointer_id: PointerId,
    /// Surface-relative position in logical pixels
    pub position: Vec2,
    /// Buttons held after this event
    pub buttons: Buttons,
    /// Button whose state changed (down/up only)
    pub button: Option<MouseButton>,
}

/// Pen-specific data carried by pointer events
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PenData {
    /// Normalized pressure in [0, 1]
    pub pressure: f32,
    /// Tilt in degrees (x, y)
    pub tilt: Vec2,
}

/// A single touch contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: PointerId,
    /// Surface-relative position in logical pixels
    pub position: Vec2,
}

/// Device-specific payload of a normalized event
#[derive(Debug, Clone, PartialEq)]
pub enum DevicePayload {
    Keyboard {
        key: Key,
        repeat: bool,
    },
    Mouse(PointerSample),
    Pointer {
        sample: PointerSample,
        /// Present for pen input
        pen: Option<PenData>,
    },
    Touch {
        /// Contacts whose state changed with this event
        changed: Vec<TouchPoint>,
        /// All contacts still on the surface after this event
        touches: Vec<TouchPoint>,
    },
    Wheel {
        position: Vec2,
        /// Scroll delta in pixels
        delta: Vec2,
    },
}

/// One canonical input event produced by the normalizer
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInputEvent {
    pub kind: EventKind,
    /// Monotonic timestamp supplied by the host
    pub timestamp: Duration,
    /// Modifier flags reported with the event, canonical order
    pub modifiers: Modifiers,
    pub payload: DevicePayload,
}

impl NormalizedInputEvent {
    /// Device class of this event
    pub fn device(&self) -> DeviceKind {
        match self.payload {
            DevicePayload::Keyboard { .. } => DeviceKind::Keyboard,
            DevicePayload::Mouse(_) => DeviceKind::Mouse,
            DevicePayload::Pointer { .. } => DeviceKind::Pointer,
            DevicePayload::Touch { .. } => DeviceKind::Touch,
            DevicePayload::Wheel { .. } => DeviceKind::Wheel,
        }
    }

    /// Key identity for keyboard events
    pub fn key(&self) -> Option<Key> {
        match self.payload {
            DevicePayload::Keyboard { key, .. } => Some(key),
            _ => None,
        }
    }

    /// True for auto-repeated keydowns
    pub fn is_repeat(&self) -> bool {
        matches!(self.payload, DevicePayload::Keyboard { repeat: true, .. })
    }

    /// Primary pointer sample
    ///
    /// For touch events this is the first changed contact.
    pub fn pointer_id(&self) -> Option<PointerId> {
        match &self.payload {
            DevicePayload::Mouse(sample) | DevicePayload::Pointer { sample, .. } => {
                Some(sample.pointer_id)
            }
            DevicePayload::Touch { changed, .. } => changed.first().map(|t| t.id),
            _ => None,
        }
    }

    /// Primary surface-relative position
    pub fn position(&self) -> Option<Vec2> {
        match &self.payload {
            DevicePayload::Mouse(sample) | DevicePayload::Pointer { sample, .. } => {
                Some(sample.position)
            }
            DevicePayload::Touch { changed, .. } => changed.first().map(|t| t.position),
            DevicePayload::Wheel { position, .. } => Some(*position),
            DevicePayload::Keyboard { .. } => None,
        }
    }

    /// Buttons held after this event (empty for touch contacts)
    pub fn buttons(&self) -> Buttons {
        match &self.payload {
            DevicePayload::Mouse(sample) | DevicePayload::Pointer { sample, .. } => sample.buttons,
            _ => Buttons::empty(),
        }
    }

    /// Button whose state changed, for mouse/pointer down and up
    pub fn button(&self) -> Option<MouseButton> {
        match &self.payload {
            DevicePayload::Mouse(sample) | DevicePayload::Pointer { sample, .. } => sample.button,
            _ => None,
        }
    }

    /// Pointer samples changed by this event
    ///
    /// Mouse and pointer events yield one sample; touch events yield every
    /// changed contact.
    pub fn changed_pointers(&self) -> Vec<(PointerId, Vec2)> {
        match &self.payload {
            DevicePayload::Mouse(sample) | DevicePayload::Pointer { sample, .. } => {
                vec![(sample.pointer_id, sample.position)]
            }
            DevicePayload::Touch { changed, .. } => {
                changed.iter().map(|t| (t.id, t.position)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// True when this event carries the given pointer among its changes
    pub fn involves_pointer(&self, id: PointerId) -> bool {
        match &self.payload {
            DevicePayload::Mouse(sample) | DevicePayload::Pointer { sample, .. } => {
                sample.pointer_id == id
            }
            DevicePayload::Touch { changed, .. } => changed.iter().any(|t| t.id == id),
            _ => false,
        }
    }

    /// Position of a specific changed pointer
    pub fn position_of(&self, id: PointerId) -> Option<Vec2> {
        match &self.payload {
            DevicePayload::Mouse(sample) | DevicePayload::Pointer { sample, .. } => {
                (sample.pointer_id == id).then_some(sample.position)
            }
            DevicePayload::Touch { changed, .. } => {
                changed.iter().find(|t| t.id == id).map(|t| t.position)
            }
            _ => None,
        }
    }

    /// Pressure/tilt for pen input
    pub fn pen(&self) -> Option<PenData> {
        match &self.payload {
            DevicePayload::Pointer { pen, .. } => *pen,
            _ => None,
        }
    }

    /// Scroll delta for wheel events
    pub fn wheel_delta(&self) -> Option<Vec2> {
        match &self.payload {
            DevicePayload::Wheel { delta, .. } => Some(*delta),
            _ => None,
        }
    }

    /// All active touch contacts (touch events only)
    pub fn touches(&self) -> &[TouchPoint] {
        match &self.payload {
            DevicePayload::Touch { touches, .. } => touches,
            _ => &[],
        }
    }

    /// True for pointing-device events (mouse, pointer, touch)
    pub fn is_pointer(&self) -> bool {
        matches!(
            self.payload,
            DevicePayload::Mouse(_) | DevicePayload::Pointer { .. } | DevicePayload::Touch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_event(kind: EventKind, changed: Vec<TouchPoint>) -> NormalizedInputEvent {
        NormalizedInputEvent {
            kind,
            timestamp: Duration::ZERO,
            modifiers: Modifiers::empty(),
            payload: DevicePayload::Touch {
                touches: changed.clone(),
                changed,
            },
        }
    }

    #[test]
    fn test_touch_primary_is_first_changed_contact() {
        let event = touch_event(
            EventKind::Down,
            vec![
                TouchPoint {
                    id: PointerId(7),
                    position: Vec2::new(1.0, 2.0),
                },
                TouchPoint {
                    id: PointerId(8),
                    position: Vec2::new(3.0, 4.0),
                },
            ],
        );
        assert_eq!(event.device(), DeviceKind::Touch);
        assert_eq!(event.pointer_id(), Some(PointerId(7)));
        assert_eq!(event.position(), Some(Vec2::new(1.0, 2.0)));
        assert!(event.involves_pointer(PointerId(8)));
        assert_eq!(event.position_of(PointerId(8)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(event.changed_pointers().len(), 2);
    }

    #[test]
    fn test_keyboard_accessors() {
        let event = NormalizedInputEvent {
            kind: EventKind::Down,
            timestamp: Duration::from_millis(5),
            modifiers: Modifiers::CTRL,
            payload: DevicePayload::Keyboard {
                key: Key::K,
                repeat: true,
            },
        };
        assert_eq!(event.key(), Some(Key::K));
        assert!(event.is_repeat());
        assert!(!event.is_pointer());
        assert_eq!(event.pointer_id(), None);
        assert_eq!(event.position(), None);
    }
}
