//! Single-pointer drag recognition

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GestureEvent;
use crate::input::{EventKind, InputState, NormalizedInputEvent, PointerId, Recognizer};

/// Pan tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanConfig {
    /// Displacement in pixels from the initiating down before the pan starts
    pub threshold: f32,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self { threshold: 10.0 }
    }
}

/// Pan notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanEvent {
    /// Fired once; carries the initiating down position
    Start { position: Vec2 },
    /// Movement since the previously reported position
    Update { delta: Vec2 },
    /// Net displacement and accumulated path length
    End { delta: Vec2, distance: f32 },
}

#[derive(Debug, Clone, Copy)]
struct PanSession {
    pointer: PointerId,
    origin: Vec2,
    last_sample: Vec2,
    last_reported: Vec2,
    path: f32,
    started: bool,
    start_time: Duration,
}

/// Recognizes a drag once it leaves the threshold radius
#[derive(Debug, Clone)]
pub struct PanRecognizer {
    config: PanConfig,
    session: Option<PanSession>,
}

impl PanRecognizer {
    pub fn new(config: PanConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &PanConfig {
        &self.config
    }

    /// True once the threshold was crossed
    pub fn is_panning(&self) -> bool {
        self.session.is_some_and(|s| s.started)
    }

    fn on_down(&mut self, event: &NormalizedInputEvent) {
        if self.session.is_some() {
            return;
        }
        if let (Some(pointer), Some(position)) = (event.pointer_id(), event.position()) {
            self.session = Some(PanSession {
                pointer,
                origin: position,
                last_sample: position,
                last_reported: position,
                path: 0.0,
                started: false,
                start_time: event.timestamp,
            });
        }
    }

    fn on_move(&mut self, event: &NormalizedInputEvent, out: &mut Vec<GestureEvent>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(position) = event.position_of(session.pointer) else {
            return;
        };

        session.path += position.distance(session.last_sample);
        session.last_sample = position;

        if !session.started {
            if position.distance(session.origin) <= self.config.threshold {
                return;
            }
            session.started = true;
            debug!(
                origin = ?session.origin,
                after = ?event.timestamp.saturating_sub(session.start_time),
                "pan started"
            );
            out.push(GestureEvent::Pan(PanEvent::Start {
                position: session.origin,
            }));
        }

        let delta = position - session.last_reported;
        session.last_reported = position;
        out.push(GestureEvent::Pan(PanEvent::Update { delta }));
    }

    fn on_up(&mut self, event: &NormalizedInputEvent, out: &mut Vec<GestureEvent>) {
        let Some(mut session) = self.session else {
            return;
        };
        if !event.involves_pointer(session.pointer) {
            return;
        }
        self.session = None;

        let position = event
            .position_of(session.pointer)
            .unwrap_or(session.last_sample);
        session.path += position.distance(session.last_sample);

        if session.started {
            let delta = position - session.origin;
            debug!(?delta, distance = session.path, "pan ended");
            out.push(GestureEvent::Pan(PanEvent::End {
                delta,
                distance: session.path,
            }));
        }
    }
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self::new(PanConfig::default())
    }
}

impl Recognizer for PanRecognizer {
    fn name(&self) -> &str {
        "pan"
    }

    fn handle(
        &mut self,
        event: &NormalizedInputEvent,
        _state: &InputState,
        out: &mut Vec<GestureEvent>,
    ) {
        if !event.is_pointer() {
            return;
        }
        match event.kind {
            EventKind::Down => self.on_down(event),
            EventKind::Move => self.on_move(event, out),
            EventKind::Up => self.on_up(event, out),
            EventKind::Cancel => {
                if let Some(session) = self.session
                    && event.involves_pointer(session.pointer)
                {
                    debug!("pan cancelled by platform");
                    self.session = None;
                }
            }
            EventKind::Wheel => {}
        }
    }

    fn cancel(&mut self, _out: &mut Vec<GestureEvent>) {
        self.session = None;
    }

    fn is_active(&self) -> bool {
        self.session.is_some()
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Buttons, DevicePayload, Modifiers, MouseButton, PointerSample};

    fn mouse(kind: EventKind, x: f32, y: f32) -> NormalizedInputEvent {
        NormalizedInputEvent {
            kind,
            timestamp: Duration::ZERO,
            modifiers: Modifiers::empty(),
            payload: DevicePayload::Mouse(PointerSample {
                pointer_id: PointerId::MOUSE,
                position: Vec2::new(x, y),
                buttons: if kind == EventKind::Up {
                    Buttons::empty()
                } else {
                    Buttons::LEFT
                },
                button: Some(MouseButton::Left),
            }),
        }
    }

    fn run(pan: &mut PanRecognizer, events: &[NormalizedInputEvent]) -> Vec<PanEvent> {
        let state = InputState::new();
        let mut out = Vec::new();
        for event in events {
            pan.handle(event, &state, &mut out);
        }
        out.into_iter()
            .map(|e| match e {
                GestureEvent::Pan(p) => p,
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_pan_starts_after_threshold() {
        let mut pan = PanRecognizer::new(PanConfig { threshold: 10.0 });
        let events = run(
            &mut pan,
            &[
                mouse(EventKind::Down, 0.0, 0.0),
                mouse(EventKind::Move, 5.0, 0.0),
                mouse(EventKind::Move, 12.0, 0.0),
            ],
        );
        assert_eq!(
            events,
            vec![
                PanEvent::Start {
                    position: Vec2::ZERO
                },
                PanEvent::Update {
                    delta: Vec2::new(12.0, 0.0)
                },
            ]
        );
        assert!(pan.is_panning());
    }

    #[test]
    fn test_updates_are_relative_to_previous_report() {
        let mut pan = PanRecognizer::new(PanConfig { threshold: 2.0 });
        let events = run(
            &mut pan,
            &[
                mouse(EventKind::Down, 0.0, 0.0),
                mouse(EventKind::Move, 5.0, 0.0),
                mouse(EventKind::Move, 5.0, 7.0),
                mouse(EventKind::Move, 1.0, 7.0),
            ],
        );
        assert_eq!(
            &events[1..],
            &[
                PanEvent::Update {
                    delta: Vec2::new(5.0, 0.0)
                },
                PanEvent::Update {
                    delta: Vec2::new(0.0, 7.0)
                },
                PanEvent::Update {
                    delta: Vec2::new(-4.0, 0.0)
                },
            ]
        );
    }

    #[test]
    fn test_end_reports_path_length_not_displacement() {
        let mut pan = PanRecognizer::new(PanConfig { threshold: 5.0 });
        let events = run(
            &mut pan,
            &[
                mouse(EventKind::Down, 0.0, 0.0),
                mouse(EventKind::Move, 30.0, 0.0),
                mouse(EventKind::Move, 30.0, 40.0),
                mouse(EventKind::Up, 0.0, 40.0),
            ],
        );
        assert_eq!(
            events.last(),
            Some(&PanEvent::End {
                delta: Vec2::new(0.0, 40.0),
                distance: 100.0,
            })
        );
        assert!(!pan.is_active());
    }

    #[test]
    fn test_release_below_threshold_emits_nothing() {
        let mut pan = PanRecognizer::default();
        let events = run(
            &mut pan,
            &[
                mouse(EventKind::Down, 0.0, 0.0),
                mouse(EventKind::Move, 3.0, 0.0),
                mouse(EventKind::Up, 3.0, 0.0),
            ],
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_platform_cancel_ends_silently() {
        let mut pan = PanRecognizer::new(PanConfig { threshold: 1.0 });
        let events = run(
            &mut pan,
            &[
                mouse(EventKind::Down, 0.0, 0.0),
                mouse(EventKind::Move, 10.0, 0.0),
                mouse(EventKind::Cancel, 10.0, 0.0),
                mouse(EventKind::Up, 10.0, 0.0),
            ],
        );
        assert_eq!(events.len(), 2);
        assert!(!pan.is_active());
    }
}
