//! Two-pointer pinch (scale) recognition

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GestureEvent;
use super::two_finger::PairGeometry;
use crate::input::{EventKind, InputState, NormalizedInputEvent, PointerId, Recognizer};

/// Pinch tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    /// Inter-pointer distance in pixels the pinch must exceed to start
    pub min_distance: f32,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self { min_distance: 10.0 }
    }
}

/// Pinch notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinchEvent {
    Start { center: Vec2, distance: f32 },
    /// Current distance over the distance when the pinch started
    Update { scale: f32 },
    End { scale: f32 },
}

#[derive(Debug, Clone, Copy)]
struct PinchSession {
    ids: [PointerId; 2],
    start_distance: f32,
    last_scale: f32,
}

/// Tracks the distance between exactly two active pointers
#[derive(Debug, Clone)]
pub struct PinchRecognizer {
    config: PinchConfig,
    session: Option<PinchSession>,
}

impl PinchRecognizer {
    pub fn new(config: PinchConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &PinchConfig {
        &self.config
    }

    /// Last reported scale of the live pinch
    pub fn scale(&self) -> Option<f32> {
        self.session.map(|s| s.last_scale)
    }

    fn continue_session(
        &mut self,
        mut session: PinchSession,
        event: &NormalizedInputEvent,
        state: &InputState,
        out: &mut Vec<GestureEvent>,
    ) {
        let tracked = session.ids.iter().any(|id| event.involves_pointer(*id));

        match event.kind {
            EventKind::Up if tracked => {
                debug!(scale = session.last_scale, "pinch ended");
                self.session = None;
                out.push(GestureEvent::Pinch(PinchEvent::End {
                    scale: session.last_scale,
                }));
                return;
            }
            EventKind::Cancel if tracked => {
                debug!("pinch cancelled by platform");
                self.session = None;
                return;
            }
            _ => {}
        }

        // Scale is undefined outside the original pair
        let Some(pair) = PairGeometry::from_state(state).filter(|p| p.ids == session.ids) else {
            debug!(pointers = state.pointer_count(), "pinch abandoned");
            self.session = None;
            return;
        };

        if event.kind == EventKind::Move && tracked {
            session.last_scale = pair.distance / session.start_distance;
            self.session = Some(session);
            out.push(GestureEvent::Pinch(PinchEvent::Update {
                scale: session.last_scale,
            }));
        }
    }

    fn try_start(
        &mut self,
        event: &NormalizedInputEvent,
        state: &InputState,
        out: &mut Vec<GestureEvent>,
    ) {
        if !matches!(event.kind, EventKind::Down | EventKind::Move) {
            return;
        }
        let Some(pair) = PairGeometry::from_state(state) else {
            return;
        };
        if pair.distance <= self.config.min_distance {
            return;
        }
        debug!(distance = pair.distance, center = ?pair.center, "pinch started");
        self.session = Some(PinchSession {
            ids: pair.ids,
            start_distance: pair.distance,
            last_scale: 1.0,
        });
        out.push(GestureEvent::Pinch(PinchEvent::Start {
            center: pair.center,
            distance: pair.distance,
        }));
    }
}

impl Default for PinchRecognizer {
    fn default() -> Self {
        Self::new(PinchConfig::default())
    }
}

impl Recognizer for PinchRecognizer {
    fn name(&self) -> &str {
        "pinch"
    }

    fn handle(
        &mut self,
        event: &NormalizedInputEvent,
        state: &InputState,
        out: &mut Vec<GestureEvent>,
    ) {
        if !event.is_pointer() {
            return;
        }
        match self.session {
            Some(session) => self.continue_session(session, event, state, out),
            None => self.try_start(event, state, out),
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
    use std::time::Duration;

    use super::*;
    use crate::input::{DevicePayload, Modifiers, TouchPoint};

    struct Harness {
        state: InputState,
        pinch: PinchRecognizer,
        out: Vec<GestureEvent>,
    }

    impl Harness {
        fn new(min_distance: f32) -> Self {
            Self {
                state: InputState::new(),
                pinch: PinchRecognizer::new(PinchConfig { min_distance }),
                out: Vec::new(),
            }
        }

        fn touch(&mut self, kind: EventKind, id: i64, x: f32, y: f32) {
            let point = TouchPoint {
                id: PointerId(id),
                position: Vec2::new(x, y),
            };
            let event = NormalizedInputEvent {
                kind,
                timestamp: Duration::ZERO,
                modifiers: Modifiers::empty(),
                payload: DevicePayload::Touch {
                    changed: vec![point],
                    touches: vec![point],
                },
            };
            self.state.update(&event);
            self.pinch.handle(&event, &self.state, &mut self.out);
        }

        fn events(&mut self) -> Vec<PinchEvent> {
            self.out
                .drain(..)
                .map(|e| match e {
                    GestureEvent::Pinch(p) => p,
                    other => panic!("unexpected {other:?}"),
                })
                .collect()
        }
    }

    #[test]
    fn test_starts_when_distance_crosses_threshold() {
        let mut h = Harness::new(10.0);
        h.touch(EventKind::Down, 1, 0.0, 0.0);
        h.touch(EventKind::Down, 2, 4.0, 0.0);
        assert!(h.events().is_empty());

        h.touch(EventKind::Move, 2, 8.0, 0.0);
        assert!(h.events().is_empty());

        h.touch(EventKind::Move, 2, 12.0, 0.0);
        assert_eq!(
            h.events(),
            vec![PinchEvent::Start {
                center: Vec2::new(6.0, 0.0),
                distance: 12.0
            }]
        );

        h.touch(EventKind::Move, 2, 20.0, 0.0);
        match h.events()[..] {
            [PinchEvent::Update { scale }] => assert!((scale - 20.0 / 12.0).abs() < 1e-5),
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_end_on_either_pointer_lifting() {
        let mut h = Harness::new(10.0);
        h.touch(EventKind::Down, 1, 0.0, 0.0);
        h.touch(EventKind::Down, 2, 20.0, 0.0);
        h.touch(EventKind::Move, 1, -20.0, 0.0);
        h.events();

        h.touch(EventKind::Up, 1, -20.0, 0.0);
        assert_eq!(h.events(), vec![PinchEvent::End { scale: 2.0 }]);
        assert!(!h.pinch.is_active());
    }

    #[test]
    fn test_third_pointer_ends_silently() {
        let mut h = Harness::new(10.0);
        h.touch(EventKind::Down, 1, 0.0, 0.0);
        h.touch(EventKind::Down, 2, 20.0, 0.0);
        h.events();

        h.touch(EventKind::Down, 3, 50.0, 50.0);
        assert!(h.events().is_empty());
        assert!(!h.pinch.is_active());

        h.touch(EventKind::Up, 3, 50.0, 50.0);
        h.touch(EventKind::Up, 1, 0.0, 0.0);
        assert!(h.events().iter().all(|e| !matches!(e, PinchEvent::End { .. })));
    }

    #[test]
    fn test_platform_cancel_ends_silently() {
        let mut h = Harness::new(10.0);
        h.touch(EventKind::Down, 1, 0.0, 0.0);
        h.touch(EventKind::Down, 2, 20.0, 0.0);
        h.events();
        h.touch(EventKind::Cancel, 2, 20.0, 0.0);
        assert!(h.events().is_empty());
        assert!(!h.pinch.is_active());
    }
}
