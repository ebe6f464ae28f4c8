// Crux's built-in Render covers view updates; the clock is ours.
mod clock;

pub use self::clock::{Clock, ClockOperation, ClockOutput, ClockResult};
pub use crux_core::render::Render;

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "crate::App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub clock: Clock<Event>,
}
