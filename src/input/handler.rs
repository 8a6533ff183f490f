//! Recognizer trait shared by every gesture detector

use std::time::Duration;

use super::clock::Deadline;
use super::events::NormalizedInputEvent;
use super::state::InputState;
use crate::gesture::GestureEvent;

/// A stateful detector driven by the normalized event stream
///
/// Recognizers never see each other. They read [`InputState`] after the
/// current event has been applied and push whatever they recognize onto
/// `out`, in order.
pub trait Recognizer {
    /// Name of this recognizer for debugging
    fn name(&self) -> &str;

    /// Handle one normalized event
    ///
    /// # Arguments
    /// * `event` - The event being dispatched
    /// * `state` - Input state with `event` already applied
    /// * `out` - Sink for recognized gesture events
    fn handle(
        &mut self,
        event: &NormalizedInputEvent,
        state: &InputState,
        out: &mut Vec<GestureEvent>,
    );

    /// Check armed deadlines against the current time
    ///
    /// Recognizers without timers ignore this.
    fn poll(&mut self, _now: Duration, _out: &mut Vec<GestureEvent>) {
        // Default: no-op
    }

    /// The earliest armed deadline, for hosts that schedule wakeups
    fn next_deadline(&self) -> Option<Deadline> {
        None
    }

    /// Deliver a host timer armed from [`Recognizer::next_deadline`]
    ///
    /// Deadlines belonging to an ended session must be ignored.
    fn on_timer(&mut self, _deadline: Deadline, _now: Duration, _out: &mut Vec<GestureEvent>) {
        // Default: no-op
    }

    /// Force any in-flight session to a terminal state
    fn cancel(&mut self, out: &mut Vec<GestureEvent>);

    /// Returns true while a session is in flight
    fn is_active(&self) -> bool;

    /// Downcast to concrete type for accessing recognizer-specific methods
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
