//! Two-pointer rotation recognition
//!
//! Each sample adds the wrapped difference to the previous orientation to a
//! running total, so the reported angle keeps growing past ±180° instead of
//! jumping at the arctangent boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GestureEvent;
use super::two_finger::{PairGeometry, wrap_degrees};
use crate::input::{EventKind, InputState, NormalizedInputEvent, PointerId, Recognizer};

/// Rotate tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateConfig {
    /// Rotation in degrees from placement before the gesture starts
    pub min_angle: f32,
}

impl Default for RotateConfig {
    fn default() -> Self {
        Self { min_angle: 5.0 }
    }
}

/// Rotate notifications, all angles in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotateEvent {
    Start { center: Vec2, angle: f32 },
    /// `angle` is the unwrapped rotation since placement, `delta` the change
    /// since the previous sample
    Update { angle: f32, delta: f32 },
    End { total: f32 },
}

#[derive(Debug, Clone, Copy)]
struct RotateSession {
    ids: [PointerId; 2],
    last_orientation: f32,
    total: f32,
    started: bool,
}

/// Tracks the unwrapped rotation of the line between two pointers
#[derive(Debug, Clone)]
pub struct RotateRecognizer {
    config: RotateConfig,
    session: Option<RotateSession>,
}

impl RotateRecognizer {
    pub fn new(config: RotateConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &RotateConfig {
        &self.config
    }

    /// Unwrapped rotation of the tracked pair so far
    pub fn total(&self) -> Option<f32> {
        self.session.map(|s| s.total)
    }

    fn track(&mut self, pair: PairGeometry) {
        self.session = Some(RotateSession {
            ids: pair.ids,
            last_orientation: pair.angle,
            total: 0.0,
            started: false,
        });
    }

    fn sample(
        &mut self,
        mut session: RotateSession,
        pair: PairGeometry,
        out: &mut Vec<GestureEvent>,
    ) {
        let delta = wrap_degrees(pair.angle - session.last_orientation);
        session.last_orientation = pair.angle;
        session.total += delta;

        if session.started {
            out.push(GestureEvent::Rotate(RotateEvent::Update {
                angle: session.total,
                delta,
            }));
        } else if session.total.abs() > self.config.min_angle {
            session.started = true;
            debug!(angle = session.total, center = ?pair.center, "rotate started");
            out.push(GestureEvent::Rotate(RotateEvent::Start {
                center: pair.center,
                angle: session.total,
            }));
        }
        self.session = Some(session);
    }
}

impl Default for RotateRecognizer {
    fn default() -> Self {
        Self::new(RotateConfig::default())
    }
}

impl Recognizer for RotateRecognizer {
    fn name(&self) -> &str {
        "rotate"
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

        let Some(session) = self.session else {
            if let Some(pair) = PairGeometry::from_state(state) {
                self.track(pair);
            }
            return;
        };

        let tracked = session.ids.iter().any(|id| event.involves_pointer(*id));
        match event.kind {
            EventKind::Up if tracked => {
                self.session = None;
                if session.started {
                    debug!(total = session.total, "rotate ended");
                    out.push(GestureEvent::Rotate(RotateEvent::End {
                        total: session.total,
                    }));
                }
                return;
            }
            EventKind::Cancel if tracked => {
                debug!("rotate cancelled by platform");
                self.session = None;
                return;
            }
            _ => {}
        }

        match PairGeometry::from_state(state).filter(|p| p.ids == session.ids) {
            Some(pair) if event.kind == EventKind::Move && tracked => {
                self.sample(session, pair, out);
            }
            Some(_) => {}
            None => {
                debug!(pointers = state.pointer_count(), "rotate abandoned");
                self.session = None;
            }
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
