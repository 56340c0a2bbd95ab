//! Interaction: drag-to-pin state machine, pan/zoom transform, hover
//! highlighting. Everything here is driven by discrete input events
//! delivered between ticks; the controller mutates only pin state, the
//! alpha target, and its own view/presentation state.

mod controller;
mod transform;

pub use controller::{DragPhase, InteractionController, Mode};
pub use transform::ViewTransform;
