//! gpio.rs — RP2040 input pins for the button registry

use embassy_rp::Peri;
use embassy_rp::gpio::{Input, Pin, Pull};

use super::{ButtonEvent, ButtonOptions, Buttons, ButtonsError};
use crate::clock::Clock;

/// Configure `pin` as an input with the internal pull-up enabled.
/// Buttons wired to GND then idle HIGH.
pub fn pull_up_input<'d>(pin: Peri<'d, impl Pin>) -> Input<'d> {
    Input::new(pin, Pull::Up)
}

impl<'d, F, C, const N: usize> Buttons<Input<'d>, F, C, N>
where
    F: FnMut(u8, ButtonEvent),
    C: Clock,
{
    /// Configure `pin` as a pull-up input and register it.
    pub fn add_pull_up_button(
        &mut self,
        id: u8,
        on_event: F,
        pin: Peri<'d, impl Pin>,
        options: ButtonOptions,
    ) -> Result<(), ButtonsError> {
        self.add_button(id, on_event, pull_up_input(pin), options)
    }
}
