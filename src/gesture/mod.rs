//! Gesture recognizers
//!
//! Each recognizer implements [`Recognizer`](crate::input::Recognizer) and
//! owns its own session state. They run side by side over the same event
//! stream and never suppress one another: a fast two-finger spread can be
//! reported as a pinch and a pan at the same time, and it is up to the
//! application to decide which one it cares about.

mod click;
mod long_press;
mod pan;
mod pinch;
mod rotate;
mod swipe;
mod two_finger;

pub use click::{ClickConfig, ClickDetector, ClickEvent};
pub use long_press::{CancelReason, LongPressConfig, LongPressDetector, LongPressEvent};
pub use pan::{PanConfig, PanEvent, PanRecognizer};
pub use pinch::{PinchConfig, PinchEvent, PinchRecognizer};
pub use rotate::{RotateConfig, RotateEvent, RotateRecognizer};
pub use swipe::{SwipeAxis, SwipeConfig, SwipeDirection, SwipeEvent, SwipeRecognizer};

/// Anything a recognizer can report
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Click(ClickEvent),
    LongPress(LongPressEvent),
    Pan(PanEvent),
    Pinch(PinchEvent),
    Rotate(RotateEvent),
    Swipe(SwipeEvent),
}

impl GestureEvent {
    /// Short family name, used in logs and the doctor's live view
    pub fn family(&self) -> &'static str {
        match self {
            GestureEvent::Click(_) => "click",
            GestureEvent::LongPress(_) => "long-press",
            GestureEvent::Pan(_) => "pan",
            GestureEvent::Pinch(_) => "pinch",
            GestureEvent::Rotate(_) => "rotate",
            GestureEvent::Swipe(_) => "swipe",
        }
    }
}
