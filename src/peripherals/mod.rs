mod button;
mod button_options;
mod button_settings;
mod buttons;
#[cfg(feature = "rp2040")]
mod gpio;

pub use button::*;
pub use button_options::*;
pub use button_settings::*;
pub use buttons::*;
#[cfg(feature = "rp2040")]
pub use gpio::*;
