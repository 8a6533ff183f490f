//! Raw input collection from winit events

use std::collections::BTreeMap;
use std::time::Duration;

use glam::Vec2;
use tracing::trace;
use winit::event::{ElementState, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{ModifiersState, PhysicalKey};

use super::keys::{Key, Modifiers, MouseButton};
use super::raw::{
    DeltaMode, RawEvent, RawKeyEvent, RawKeyPhase, RawMouseEvent, RawPhase, RawTouch,
    RawTouchEvent, RawWheelEvent, Rect, Surface,
};

/// Touch ids are shifted past the mouse pointer id so the two never collide
const TOUCH_ID_BASE: i64 = 1 << 32;

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::CTRL, state.control_key());
        modifiers.set(Modifiers::ALT, state.alt_key());
        modifiers.set(Modifiers::SHIFT, state.shift_key());
        modifiers.set(Modifiers::META, state.super_key());
        modifiers
    }
}

fn button_index(button: winit::event::MouseButton) -> Option<i16> {
    match button {
        winit::event::MouseButton::Left => Some(0),
        winit::event::MouseButton::Middle => Some(1),
        winit::event::MouseButton::Right => Some(2),
        winit::event::MouseButton::Back => Some(3),
        winit::event::MouseButton::Forward => Some(4),
        winit::event::MouseButton::Other(_) => None,
    }
}

/// Translates winit window events into raw events
///
/// Positions are reported in physical pixels. The collector is also the
/// [`Surface`] those positions refer to, carrying the window size and DPI
/// scale factor, so normalization against it yields logical pixels.
pub struct InputCollector {
    cursor: Option<Vec2>,
    buttons: u16,
    modifiers: Modifiers,
    touches: BTreeMap<u64, Vec2>,
    size: Vec2,
    scale_factor: f32,
}

impl InputCollector {
    /// Creates a new input collector
    pub fn new() -> Self {
        Self {
            cursor: None,
            buttons: 0,
            modifiers: Modifiers::empty(),
            touches: BTreeMap::new(),
            size: Vec2::ZERO,
            scale_factor: 1.0,
        }
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    /// Update the physical window size
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Forget held buttons and touches, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.buttons = 0;
        self.touches.clear();
        self.modifiers = Modifiers::empty();
    }

    /// Handle a winit window event
    ///
    /// Returns the raw event to forward, or `None` for events that only
    /// update collector state (resize, scale factor, modifiers) or that
    /// carry no input.
    pub fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        now: Duration,
    ) -> Option<RawEvent> {
        match event {
            WindowEvent::Resized(size) => {
                self.set_size(size.width as f32, size.height as f32);
                None
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor as f32);
                None
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state().into();
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                let client = Vec2::new(position.x as f32, position.y as f32);
                self.cursor = Some(client);
                Some(self.mouse_event(RawPhase::Move, client, 0, now))
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let index = button_index(*button)?;
                let client = self.cursor?;
                let flag = MouseButton::from_index(index)?.flag().bits();
                let phase = match state {
                    ElementState::Pressed => {
                        self.buttons |= flag;
                        RawPhase::Down
                    }
                    ElementState::Released => {
                        self.buttons &= !flag;
                        RawPhase::Up
                    }
                };
                Some(self.mouse_event(phase, client, index, now))
            }

            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports positive y for scrolling up; raw deltas follow
                // the content-offset convention where down is positive
                let (delta, mode) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (Vec2::new(-*x, -*y), DeltaMode::Line),
                    MouseScrollDelta::PixelDelta(pos) => {
                        (Vec2::new(-pos.x as f32, -pos.y as f32), DeltaMode::Pixel)
                    }
                };
                Some(RawEvent::Wheel(RawWheelEvent {
                    client: self.cursor.unwrap_or_default(),
                    delta,
                    mode,
                    modifiers: self.modifiers,
                    timestamp: now,
                }))
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => Key::from(code),
                    PhysicalKey::Unidentified(_) => Key::Unidentified,
                };
                let phase = match event.state {
                    ElementState::Pressed => RawKeyPhase::Down,
                    ElementState::Released => RawKeyPhase::Up,
                };
                Some(RawEvent::Key(RawKeyEvent {
                    phase,
                    key: key.name().to_string(),
                    repeat: event.repeat,
                    modifiers: self.modifiers,
                    timestamp: now,
                }))
            }

            WindowEvent::Touch(touch) => {
                let client = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                let phase = match touch.phase {
                    TouchPhase::Started => RawPhase::Down,
                    TouchPhase::Moved => RawPhase::Move,
                    TouchPhase::Ended => RawPhase::Up,
                    TouchPhase::Cancelled => RawPhase::Cancel,
                };
                match phase {
                    RawPhase::Down | RawPhase::Move => {
                        self.touches.insert(touch.id, client);
                    }
                    RawPhase::Up | RawPhase::Cancel => {
                        self.touches.remove(&touch.id);
                    }
                }
                let contact = |id: u64, client: Vec2| RawTouch {
                    identifier: TOUCH_ID_BASE + id as i64,
                    client,
                };
                Some(RawEvent::Touch(RawTouchEvent {
                    phase,
                    changed: vec![contact(touch.id, client)],
                    touches: self
                        .touches
                        .iter()
                        .map(|(id, client)| contact(*id, *client))
                        .collect(),
                    modifiers: self.modifiers,
                    timestamp: now,
                }))
            }

            WindowEvent::Focused(false) => {
                trace!("window lost focus");
                self.clear();
                None
            }

            _ => None,
        }
    }

    fn mouse_event(&self, phase: RawPhase, client: Vec2, button: i16, now: Duration) -> RawEvent {
        RawEvent::Mouse(RawMouseEvent {
            phase,
            client,
            button,
            buttons: self.buttons,
            modifiers: self.modifiers,
            timestamp: now,
        })
    }

    /// Last cursor position in physical pixels
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for InputCollector {
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.x, self.size.y)
    }

    fn scale_factor(&self) -> f32 {
        self.scale_factor
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::DeviceId;

    use super::*;
    use crate::input::{EventKind, normalize_event};

    fn device() -> DeviceId {
        // SAFETY: only used as an opaque id in synthetic events
        unsafe { DeviceId::dummy() }
    }

    fn cursor_moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn mouse_input(state: ElementState, button: winit::event::MouseButton) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device(),
            state,
            button,
        }
    }

    #[test]
    fn test_button_needs_known_cursor() {
        let mut collector = InputCollector::new();
        let press = mouse_input(ElementState::Pressed, winit::event::MouseButton::Left);
        assert!(collector.handle_window_event(&press, Duration::ZERO).is_none());
    }

    #[test]
    fn test_buttons_mask_tracks_presses() {
        let mut collector = InputCollector::new();
        collector.handle_window_event(&cursor_moved(10.0, 20.0), Duration::ZERO);

        let press = mouse_input(ElementState::Pressed, winit::event::MouseButton::Right);
        match collector.handle_window_event(&press, Duration::from_millis(5)) {
            Some(RawEvent::Mouse(raw)) => {
                assert_eq!(raw.phase, RawPhase::Down);
                assert_eq!(raw.button, 2);
                assert_eq!(raw.buttons, 2);
                assert_eq!(raw.client, Vec2::new(10.0, 20.0));
            }
            other => panic!("unexpected {other:?}"),
        }

        let release = mouse_input(ElementState::Released, winit::event::MouseButton::Right);
        match collector.handle_window_event(&release, Duration::from_millis(9)) {
            Some(RawEvent::Mouse(raw)) => assert_eq!(raw.buttons, 0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_surface_applies_scale_factor() {
        let mut collector = InputCollector::new();
        let resized = WindowEvent::Resized(PhysicalSize::new(1600, 1200));
        collector.handle_window_event(&resized, Duration::ZERO);
        collector.set_scale_factor(2.0);

        let raw = collector
            .handle_window_event(&cursor_moved(300.0, 100.0), Duration::ZERO)
            .unwrap();
        let event = normalize_event(&raw, &collector).unwrap();
        assert_eq!(event.kind, EventKind::Move);
        assert_eq!(event.position(), Some(Vec2::new(150.0, 50.0)));
    }

    #[test]
    fn test_wheel_lines_flip_to_content_offset() {
        let mut collector = InputCollector::new();
        let wheel = WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
            phase: TouchPhase::Moved,
        };
        match collector.handle_window_event(&wheel, Duration::ZERO) {
            Some(RawEvent::Wheel(raw)) => {
                assert_eq!(raw.mode, DeltaMode::Line);
                assert_eq!(raw.delta, Vec2::new(0.0, -1.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_modifiers_from_winit_state() {
        let state = ModifiersState::CONTROL | ModifiersState::SUPER;
        assert_eq!(Modifiers::from(state), Modifiers::CTRL | Modifiers::META);
    }
}
