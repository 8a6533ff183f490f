//! Press-and-hold detection
//!
//! ```text
//! Idle --down--> Pressing --deadline--> Fired --up--> Idle
//!                   |  \--move beyond tolerance--> Idle (Cancel: moved)
//!                   \--up before deadline--> Idle (Cancel: released)
//! ```
//!
//! The deadline is an explicit value, not a host callback. It is checked
//! lazily at the start of every `handle`, by `poll`, and by `on_timer`; the
//! last one ignores deadlines from sessions that already ended.

use std::fmt;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GestureEvent;
use crate::input::{
    Deadline, EventKind, InputState, NormalizedInputEvent, PointerId, Recognizer, SessionId,
};

/// Long-press tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongPressConfig {
    /// Hold time before the long press fires
    pub duration_ms: u64,
    /// Max movement in pixels from the initial press
    pub tolerance: f32,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            tolerance: 10.0,
        }
    }
}

impl LongPressConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Why a press ended without completing normally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// Moved beyond tolerance before the deadline
    Moved,
    /// Released before the deadline
    Released,
    /// Platform cancel, detach or focus loss
    Interrupted,
}

impl CancelReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Moved => "moved",
            Self::Released => "released",
            Self::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Long-press notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongPressEvent {
    Start { position: Vec2 },
    Update { position: Vec2, elapsed: Duration },
    LongPress { position: Vec2, elapsed: Duration },
    End { position: Vec2 },
    Cancel { reason: CancelReason },
}

#[derive(Debug, Clone, Copy)]
struct PressSession {
    id: SessionId,
    pointer: PointerId,
    origin: Vec2,
    last: Vec2,
    started: Duration,
    deadline: Duration,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Pressing(PressSession),
    Fired(PressSession),
}

/// Detects a pointer held still for `duration`
#[derive(Debug, Clone)]
pub struct LongPressDetector {
    config: LongPressConfig,
    phase: Phase,
    next_session: u64,
}

impl LongPressDetector {
    pub fn new(config: LongPressConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            next_session: 0,
        }
    }

    pub fn config(&self) -> &LongPressConfig {
        &self.config
    }

    /// True between the down and the deadline
    pub fn is_pressing(&self) -> bool {
        matches!(self.phase, Phase::Pressing(_))
    }

    /// True after the long press fired, until release
    pub fn has_fired(&self) -> bool {
        matches!(self.phase, Phase::Fired(_))
    }

    fn fire(&mut self, session: PressSession, now: Duration, out: &mut Vec<GestureEvent>) {
        let elapsed = now.saturating_sub(session.started);
        debug!(session = session.id.0, ?elapsed, "long press fired");
        self.phase = Phase::Fired(session);
        out.push(GestureEvent::LongPress(LongPressEvent::LongPress {
            position: session.last,
            elapsed,
        }));
    }

    fn end(&mut self, event: LongPressEvent, out: &mut Vec<GestureEvent>) {
        if let LongPressEvent::Cancel { reason } = event {
            debug!(%reason, "long press cancelled");
        }
        self.phase = Phase::Idle;
        out.push(GestureEvent::LongPress(event));
    }

    fn on_down(&mut self, event: &NormalizedInputEvent, out: &mut Vec<GestureEvent>) {
        if !matches!(self.phase, Phase::Idle) {
            return;
        }
        let (Some(pointer), Some(position)) = (event.pointer_id(), event.position()) else {
            return;
        };
        self.next_session += 1;
        let session = PressSession {
            id: SessionId(self.next_session),
            pointer,
            origin: position,
            last: position,
            started: event.timestamp,
            deadline: event.timestamp + self.config.duration(),
        };
        debug!(session = session.id.0, ?position, "long press armed");
        self.phase = Phase::Pressing(session);
        out.push(GestureEvent::LongPress(LongPressEvent::Start { position }));
    }

    fn on_move(&mut self, event: &NormalizedInputEvent, out: &mut Vec<GestureEvent>) {
        let Phase::Pressing(mut session) = self.phase else {
            return;
        };
        let Some(position) = event.position_of(session.pointer) else {
            return;
        };
        let elapsed = event.timestamp.saturating_sub(session.started);
        out.push(GestureEvent::LongPress(LongPressEvent::Update { position, elapsed }));

        if position.distance(session.origin) > self.config.tolerance {
            self.end(
                LongPressEvent::Cancel {
                    reason: CancelReason::Moved,
                },
                out,
            );
        } else {
            session.last = position;
            self.phase = Phase::Pressing(session);
        }
    }

    fn on_release(&mut self, event: &NormalizedInputEvent, out: &mut Vec<GestureEvent>) {
        match self.phase {
            Phase::Pressing(session) if event.involves_pointer(session.pointer) => {
                self.end(
                    LongPressEvent::Cancel {
                        reason: CancelReason::Released,
                    },
                    out,
                );
            }
            Phase::Fired(session) if event.involves_pointer(session.pointer) => {
                let position = event.position_of(session.pointer).unwrap_or(session.last);
                self.end(LongPressEvent::End { position }, out);
            }
            _ => {}
        }
    }

    fn on_platform_cancel(&mut self, event: &NormalizedInputEvent, out: &mut Vec<GestureEvent>) {
        match self.phase {
            Phase::Pressing(session) | Phase::Fired(session)
                if event.involves_pointer(session.pointer) =>
            {
                self.end(
                    LongPressEvent::Cancel {
                        reason: CancelReason::Interrupted,
                    },
                    out,
                );
            }
            _ => {}
        }
    }
}

impl Default for LongPressDetector {
    fn default() -> Self {
        Self::new(LongPressConfig::default())
    }
}

impl Recognizer for LongPressDetector {
    fn name(&self) -> &str {
        "long_press"
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
        // A deadline that passed before this event fires first
        self.poll(event.timestamp, out);

        match event.kind {
            EventKind::Down => self.on_down(event, out),
            EventKind::Move => self.on_move(event, out),
            EventKind::Up => self.on_release(event, out),
            EventKind::Cancel => self.on_platform_cancel(event, out),
            EventKind::Wheel => {}
        }
    }

    fn poll(&mut self, now: Duration, out: &mut Vec<GestureEvent>) {
        if let Phase::Pressing(session) = self.phase
            && now >= session.deadline
        {
            self.fire(session, now, out);
        }
    }

    fn next_deadline(&self) -> Option<Deadline> {
        match self.phase {
            Phase::Pressing(session) => Some(Deadline {
                session: session.id,
                at: session.deadline,
            }),
            _ => None,
        }
    }

    fn on_timer(&mut self, deadline: Deadline, now: Duration, out: &mut Vec<GestureEvent>) {
        match self.phase {
            Phase::Pressing(session) if session.id == deadline.session && deadline.is_due(now) => {
                self.fire(session, now, out);
            }
            _ => {
                debug!(session = deadline.session.0, "stale long press timer ignored");
            }
        }
    }

    fn cancel(&mut self, out: &mut Vec<GestureEvent>) {
        if !matches!(self.phase, Phase::Idle) {
            self.end(
                LongPressEvent::Cancel {
                    reason: CancelReason::Interrupted,
                },
                out,
            );
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
