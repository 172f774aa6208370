// We use Crux's built-in Render capability directly because it provides
// all necessary functionality for triggering view updates. Service calls
// go through the `Hass` capability and are executed by the shell.

mod hass;

pub use self::hass::{Hass, HassOperation, ServiceCall};
pub use crux_core::render::Render;

use crate::event::Event;
#[allow(unused_imports)]
use crate::App;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub hass: Hass<Event>,
}
