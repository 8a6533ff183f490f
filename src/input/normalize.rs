//! Raw event normalization
//!
//! A pure mapping from whatever the host reported to one
//! [`NormalizedInputEvent`]. Nothing here touches state; feeding the same
//! raw event twice yields equal results.

use glam::Vec2;

use super::events::{
    DevicePayload, EventKind, NormalizedInputEvent, PenData, PointerId, PointerSample, TouchPoint,
};
use super::keys::{Buttons, Key, MouseButton};
use super::raw::{
    DeltaMode, PointerType, RawEvent, RawKeyEvent, RawKeyPhase, RawMouseEvent, RawPhase,
    RawPointerEvent, RawTouch, RawTouchEvent, RawWheelEvent, Surface,
};

/// Pixels per line for line-mode wheel deltas
pub const LINE_DELTA_PX: f32 = 20.0;

/// Normalize a raw platform event against a reference surface
///
/// Returns `None` for unsupported event kinds and malformed events (empty
/// key names, non-finite coordinates, touch events without changed
/// contacts). Callers treat `None` as a no-op.
pub fn normalize_event(raw: &RawEvent, surface: &dyn Surface) -> Option<NormalizedInputEvent> {
    let frame = Frame::of(surface)?;
    match raw {
        RawEvent::Key(event) => normalize_key(event),
        RawEvent::Mouse(event) => normalize_mouse(event, &frame),
        RawEvent::Pointer(event) => normalize_pointer(event, &frame),
        RawEvent::Touch(event) => normalize_touch(event, &frame),
        RawEvent::Wheel(event) => normalize_wheel(event, &frame),
        RawEvent::Unsupported(_) => None,
    }
}

/// Client-to-surface coordinate transform
struct Frame {
    origin: Vec2,
    size: Vec2,
    scale: f32,
}

impl Frame {
    fn of(surface: &dyn Surface) -> Option<Self> {
        let bounds = surface.bounds();
        let scale = surface.scale_factor();
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        Some(Self {
            origin: bounds.origin(),
            size: Vec2::new(bounds.width, bounds.height),
            scale,
        })
    }

    fn to_surface(&self, client: Vec2) -> Option<Vec2> {
        if !client.is_finite() {
            return None;
        }
        Some((client - self.origin) / self.scale)
    }
}

fn phase_kind(phase: RawPhase) -> EventKind {
    match phase {
        RawPhase::Down => EventKind::Down,
        RawPhase::Up => EventKind::Up,
        RawPhase::Move => EventKind::Move,
        RawPhase::Cancel => EventKind::Cancel,
    }
}

/// Button that changed, only meaningful on down/up
fn changed_button(phase: RawPhase, index: i16) -> Option<MouseButton> {
    match phase {
        RawPhase::Down | RawPhase::Up => MouseButton::from_index(index),
        RawPhase::Move | RawPhase::Cancel => None,
    }
}

fn normalize_key(event: &RawKeyEvent) -> Option<NormalizedInputEvent> {
    if event.key.is_empty() {
        return None;
    }
    let key = Key::from_name(&event.key).unwrap_or(Key::Unidentified);
    let kind = match event.phase {
        RawKeyPhase::Down => EventKind::Down,
        RawKeyPhase::Up => EventKind::Up,
    };
    Some(NormalizedInputEvent {
        kind,
        timestamp: event.timestamp,
        modifiers: event.modifiers,
        payload: DevicePayload::Keyboard {
            key,
            repeat: event.repeat,
        },
    })
}

fn normalize_mouse(event: &RawMouseEvent, frame: &Frame) -> Option<NormalizedInputEvent> {
    let position = frame.to_surface(event.client)?;
    Some(NormalizedInputEvent {
        kind: phase_kind(event.phase),
        timestamp: event.timestamp,
        modifiers: event.modifiers,
        payload: DevicePayload::Mouse(PointerSample {
            pointer_id: PointerId::MOUSE,
            position,
            buttons: Buttons::from_bits_truncate(event.buttons),
            button: changed_button(event.phase, event.button),
        }),
    })
}

fn normalize_pointer(event: &RawPointerEvent, frame: &Frame) -> Option<NormalizedInputEvent> {
    let position = frame.to_surface(event.client)?;
    let sample = PointerSample {
        pointer_id: PointerId(event.pointer_id),
        position,
        buttons: Buttons::from_bits_truncate(event.buttons),
        button: changed_button(event.phase, event.button),
    };
    let pen = match event.pointer_type {
        PointerType::Pen => Some(PenData {
            pressure: if event.pressure.is_finite() {
                event.pressure.clamp(0.0, 1.0)
            } else {
                0.0
            },
            tilt: if event.tilt.is_finite() {
                event.tilt
            } else {
                Vec2::ZERO
            },
        }),
        PointerType::Mouse | PointerType::Touch => None,
    };
    Some(NormalizedInputEvent {
        kind: phase_kind(event.phase),
        timestamp: event.timestamp,
        modifiers: event.modifiers,
        payload: DevicePayload::Pointer { sample, pen },
    })
}

fn touch_points(touches: &[RawTouch], frame: &Frame) -> Option<Vec<TouchPoint>> {
    touches
        .iter()
        .map(|touch| {
            frame.to_surface(touch.client).map(|position| TouchPoint {
                id: PointerId(touch.identifier),
                position,
            })
        })
        .collect()
}

fn normalize_touch(event: &RawTouchEvent, frame: &Frame) -> Option<NormalizedInputEvent> {
    if event.changed.is_empty() {
        return None;
    }
    let changed = touch_points(&event.changed, frame)?;
    let touches = touch_points(&event.touches, frame)?;
    Some(NormalizedInputEvent {
        kind: phase_kind(event.phase),
        timestamp: event.timestamp,
        modifiers: event.modifiers,
        payload: DevicePayload::Touch { changed, touches },
    })
}

fn normalize_wheel(event: &RawWheelEvent, frame: &Frame) -> Option<NormalizedInputEvent> {
    let position = frame.to_surface(event.client)?;
    if !event.delta.is_finite() {
        return None;
    }
    // Convert to consistent pixel units
    let delta = match event.mode {
        DeltaMode::Pixel => event.delta,
        DeltaMode::Line => event.delta * LINE_DELTA_PX,
        DeltaMode::Page => event.delta * frame.size,
    };
    Some(NormalizedInputEvent {
        kind: EventKind::Wheel,
        timestamp: event.timestamp,
        modifiers: event.modifiers,
        payload: DevicePayload::Wheel { position, delta },
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::input::events::DeviceKind;
    use crate::input::keys::Modifiers;
    use crate::input::raw::Rect;

    fn surface() -> Rect {
        Rect::new(100.0, 50.0, 400.0, 300.0)
    }

    fn mouse(phase: RawPhase, x: f32, y: f32, button: i16, buttons: u16) -> RawEvent {
        RawEvent::Mouse(RawMouseEvent {
            phase,
            client: Vec2::new(x, y),
            button,
            buttons,
            modifiers: Modifiers::empty(),
            timestamp: Duration::from_millis(10),
        })
    }

    struct HiDpi;

    impl Surface for HiDpi {
        fn bounds(&self) -> Rect {
            Rect::new(0.0, 0.0, 800.0, 600.0)
        }

        fn scale_factor(&self) -> f32 {
            2.0
        }
    }

    #[test]
    fn test_mouse_coordinates_are_surface_relative() {
        let event = normalize_event(&mouse(RawPhase::Down, 150.0, 80.0, 0, 1), &surface())
            .expect("mouse down normalizes");
        assert_eq!(event.kind, EventKind::Down);
        assert_eq!(event.device(), DeviceKind::Mouse);
        assert_eq!(event.position(), Some(Vec2::new(50.0, 30.0)));
        assert_eq!(event.pointer_id(), Some(PointerId::MOUSE));
        assert_eq!(event.button(), Some(MouseButton::Left));
        assert_eq!(event.buttons(), Buttons::LEFT);
    }

    #[test]
    fn test_scale_factor_converts_to_logical_pixels() {
        let event = normalize_event(&mouse(RawPhase::Move, 200.0, 100.0, 0, 0), &HiDpi)
            .expect("move normalizes");
        assert_eq!(event.position(), Some(Vec2::new(100.0, 50.0)));
        assert_eq!(event.button(), None);
    }

    #[test]
    fn test_button_mask_decodes_to_ordered_set() {
        let event = normalize_event(&mouse(RawPhase::Move, 0.0, 0.0, -1, 0b111), &surface())
            .expect("move normalizes");
        let buttons: Vec<_> = event.buttons().iter_buttons().collect();
        assert_eq!(
            buttons,
            vec![MouseButton::Left, MouseButton::Right, MouseButton::Middle]
        );
    }

    #[test]
    fn test_keyboard_passes_key_and_modifiers() {
        let raw = RawEvent::Key(RawKeyEvent {
            phase: RawKeyPhase::Down,
            key: "k".to_string(),
            repeat: false,
            modifiers: Modifiers::SHIFT | Modifiers::CTRL,
            timestamp: Duration::from_millis(3),
        });
        let event = normalize_event(&raw, &surface()).expect("key normalizes");
        assert_eq!(event.key(), Some(Key::K));
        assert_eq!(event.modifiers, Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(event.timestamp, Duration::from_millis(3));
    }

    #[test]
    fn test_unknown_key_is_unidentified_and_empty_key_is_dropped() {
        let mut raw = RawKeyEvent {
            phase: RawKeyPhase::Down,
            key: "MediaPlayPause".to_string(),
            repeat: false,
            modifiers: Modifiers::empty(),
            timestamp: Duration::ZERO,
        };
        let event = normalize_event(&RawEvent::Key(raw.clone()), &surface()).expect("normalizes");
        assert_eq!(event.key(), Some(Key::Unidentified));

        raw.key.clear();
        assert!(normalize_event(&RawEvent::Key(raw), &surface()).is_none());
    }

    #[test]
    fn test_touch_extracts_all_contacts() {
        let raw = RawEvent::Touch(RawTouchEvent {
            phase: RawPhase::Down,
            changed: vec![RawTouch {
                identifier: 2,
                client: Vec2::new(120.0, 60.0),
            }],
            touches: vec![
                RawTouch {
                    identifier: 1,
                    client: Vec2::new(110.0, 55.0),
                },
                RawTouch {
                    identifier: 2,
                    client: Vec2::new(120.0, 60.0),
                },
            ],
            modifiers: Modifiers::empty(),
            timestamp: Duration::ZERO,
        });
        let event = normalize_event(&raw, &surface()).expect("touch normalizes");
        assert_eq!(event.pointer_id(), Some(PointerId(2)));
        assert_eq!(event.touches().len(), 2);
        assert_eq!(event.touches()[0].position, Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_touch_without_changed_contacts_is_dropped() {
        let raw = RawEvent::Touch(RawTouchEvent {
            phase: RawPhase::Move,
            changed: Vec::new(),
            touches: Vec::new(),
            modifiers: Modifiers::empty(),
            timestamp: Duration::ZERO,
        });
        assert!(normalize_event(&raw, &surface()).is_none());
    }

    #[test]
    fn test_pen_pressure_and_tilt() {
        let raw = RawEvent::Pointer(RawPointerEvent {
            phase: RawPhase::Move,
            pointer_id: 5,
            pointer_type: PointerType::Pen,
            client: Vec2::new(100.0, 50.0),
            button: -1,
            buttons: 1,
            pressure: 1.7,
            tilt: Vec2::new(10.0, -5.0),
            modifiers: Modifiers::empty(),
            timestamp: Duration::ZERO,
        });
        let event = normalize_event(&raw, &surface()).expect("pen normalizes");
        let pen = event.pen().expect("pen data");
        assert_eq!(pen.pressure, 1.0);
        assert_eq!(pen.tilt, Vec2::new(10.0, -5.0));
        assert_eq!(event.device(), DeviceKind::Pointer);
    }

    #[test]
    fn test_wheel_line_mode_converts_to_pixels() {
        let raw = RawEvent::Wheel(RawWheelEvent {
            client: Vec2::new(100.0, 50.0),
            delta: Vec2::new(0.0, 3.0),
            mode: DeltaMode::Line,
            modifiers: Modifiers::empty(),
            timestamp: Duration::ZERO,
        });
        let event = normalize_event(&raw, &surface()).expect("wheel normalizes");
        assert_eq!(event.kind, EventKind::Wheel);
        assert_eq!(event.wheel_delta(), Some(Vec2::new(0.0, 60.0)));
    }

    #[test]
    fn test_unsupported_and_malformed_events_are_none() {
        assert!(normalize_event(&RawEvent::Unsupported("focus".into()), &surface()).is_none());
        assert!(
            normalize_event(&mouse(RawPhase::Move, f32::NAN, 0.0, 0, 0), &surface()).is_none()
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = mouse(RawPhase::Down, 140.0, 90.0, 2, 2);
        let first = normalize_event(&raw, &surface());
        let second = normalize_event(&raw, &surface());
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
