//! buttons.rs — registry polling a fixed set of buttons from one clock
//!
//! # Example
//!
//! ```ignore
//! fn on_button(id: u8, event: ButtonEvent) {
//!     info!("button {} -> {}", id, event);
//! }
//!
//! let mut buttons: Buttons<_, fn(u8, ButtonEvent), _, 4> = Buttons::new(EmbassyClock);
//! buttons.settings_mut().long_press_ms = 1500;
//! buttons.add_pull_up_button(1, on_button, p.PIN_14, ButtonOptions::default())?;
//! buttons.add_pull_up_button(2, on_button, p.PIN_15, ButtonOptions::PRESS | ButtonOptions::RELEASE)?;
//!
//! loop {
//!     buttons.poll();
//!     Timer::after_millis(1).await;
//! }
//! ```

use embedded_hal::digital::InputPin;
use heapless::Vec;

use super::{Button, ButtonEvent, ButtonOptions, ButtonSettings};
use crate::clock::Clock;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonsError {
    #[error("Button registry is full ({capacity} buttons)")]
    Full { capacity: usize },
    #[error("No button with id {0}")]
    UnknownButton(u8),
}

/// Up to `N` buttons sharing one [`ButtonSettings`] and one [`Clock`].
///
/// Call [`Buttons::poll`] from the main loop; every button is sampled once
/// per call against a single clock reading.
pub struct Buttons<P, F, C, const N: usize> {
    buttons: Vec<Button<P, F>, N>,
    settings: ButtonSettings,
    clock: C,
}

impl<P, F, C, const N: usize> Buttons<P, F, C, N>
where
    P: InputPin,
    F: FnMut(u8, ButtonEvent),
    C: Clock,
{
    pub fn new(clock: C) -> Self {
        Self::with_settings(clock, ButtonSettings::default())
    }

    pub fn with_settings(clock: C, settings: ButtonSettings) -> Self {
        if let Err(e) = settings.validate() {
            warn!("Invalid button settings: {}", e);
        }
        Self {
            buttons: Vec::new(),
            settings,
            clock,
        }
    }

    /// Register a button on an input pin.
    ///
    /// Caller must configure the pin as pull-up input before calling this.
    /// Ids need not be unique; lookups by id find the earliest registration.
    pub fn add_button(
        &mut self,
        id: u8,
        on_event: F,
        pin: P,
        options: ButtonOptions,
    ) -> Result<(), ButtonsError> {
        if self.buttons.is_full() {
            warn!("Button {=u8} dropped, registry holds {=usize}", id, N);
            return Err(ButtonsError::Full { capacity: N });
        }

        let now = self.clock.now_ms();
        let button = Button::new(id, pin, options, on_event, &self.settings, now);
        self.buttons
            .push(button)
            .map_err(|_| ButtonsError::Full { capacity: N })?;

        debug!("Button {=u8} registered with {}", id, options);
        Ok(())
    }

    /// Register a button reporting short, long and double presses.
    pub fn add_default_button(&mut self, id: u8, on_event: F, pin: P) -> Result<(), ButtonsError> {
        self.add_button(id, on_event, pin, ButtonOptions::default())
    }

    /// Sample the clock once and advance every button.
    pub fn poll(&mut self) {
        let now = self.clock.now_ms();
        self.poll_at(now);
    }

    /// Advance every button to `now`.
    pub fn poll_at(&mut self, now: u32) {
        for button in self.buttons.iter_mut() {
            button.poll(now, &self.settings);
        }
    }

    /// Returns true if button `id` currently reads idle, or if there is no
    /// such button.
    pub fn is_idle(&mut self, id: u8) -> bool {
        self.buttons
            .iter_mut()
            .find(|button| button.id() == id)
            .is_none_or(|button| button.is_idle())
    }

    /// Replace the handler of button `id`.
    pub fn set_handler(&mut self, id: u8, on_event: F) -> Result<(), ButtonsError> {
        let button = self
            .buttons
            .iter_mut()
            .find(|button| button.id() == id)
            .ok_or(ButtonsError::UnknownButton(id))?;
        button.set_handler(on_event);
        Ok(())
    }

    pub fn settings(&self) -> &ButtonSettings {
        &self.settings
    }

    /// Tune the shared timing. Meant for use before the first poll.
    pub fn settings_mut(&mut self) -> &mut ButtonSettings {
        &mut self.settings
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Poll forever, once per `period`.
    #[cfg(feature = "embassy-time")]
    pub async fn run(&mut self, period: embassy_time::Duration) -> ! {
        let mut ticker = embassy_time::Ticker::every(period);
        loop {
            self.poll();
            ticker.next().await;
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::cell::Cell;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as MockState, Transaction as PinTransaction,
    };
    use std::vec::Vec;

    fn ignore(_: u8, _: ButtonEvent) {}

    type Registry<'a, const N: usize> =
        Buttons<PinMock, fn(u8, ButtonEvent), &'a dyn Fn() -> u32, N>;

    fn reads(states: &[MockState]) -> (PinMock, PinMock) {
        let expectations: Vec<PinTransaction> =
            states.iter().map(|state| PinTransaction::get(*state)).collect();
        let pin = PinMock::new(&expectations);
        let handle = pin.clone();
        (pin, handle)
    }

    #[test]
    fn rejects_buttons_past_capacity() {
        let clock = || 0u32;
        let mut buttons: Registry<'_, 1> = Buttons::new(&clock);
        let (first, mut first_handle) = reads(&[MockState::High]);
        let (second, mut second_handle) = reads(&[]);

        assert_eq!(buttons.add_default_button(1, ignore, first), Ok(()));
        assert_eq!(
            buttons.add_default_button(2, ignore, second),
            Err(ButtonsError::Full { capacity: 1 })
        );
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons.capacity(), 1);

        first_handle.done();
        second_handle.done();
    }

    #[test]
    fn unknown_ids_read_idle() {
        let clock = || 0u32;
        let mut buttons: Registry<'_, 2> = Buttons::new(&clock);
        assert!(buttons.is_empty());
        assert!(buttons.is_idle(42));
    }

    #[test]
    fn is_idle_uses_first_registration_of_an_id() {
        let clock = || 0u32;
        let mut buttons: Registry<'_, 2> = Buttons::new(&clock);
        let (first, mut first_handle) = reads(&[MockState::High, MockState::Low]);
        let (second, mut second_handle) = reads(&[MockState::High]);

        buttons.add_default_button(5, ignore, first).unwrap();
        buttons.add_default_button(5, ignore, second).unwrap();
        assert!(!buttons.is_idle(5));

        first_handle.done();
        second_handle.done();
    }

    #[test]
    fn idle_low_button_is_idle_when_low() {
        let clock = || 0u32;
        let mut buttons: Registry<'_, 1> = Buttons::new(&clock);
        let (pin, mut handle) = reads(&[MockState::Low, MockState::Low, MockState::High]);

        buttons
            .add_button(1, ignore, pin, ButtonOptions::SHORT | ButtonOptions::IDLE_LOW)
            .unwrap();
        assert!(buttons.is_idle(1));
        assert!(!buttons.is_idle(1));

        handle.done();
    }

    #[test]
    fn set_handler_requires_a_known_id() {
        let clock = || 0u32;
        let mut buttons: Registry<'_, 1> = Buttons::new(&clock);
        let (pin, mut handle) = reads(&[MockState::High]);

        buttons.add_default_button(1, ignore, pin).unwrap();
        assert_eq!(buttons.set_handler(1, ignore), Ok(()));
        assert_eq!(
            buttons.set_handler(2, ignore),
            Err(ButtonsError::UnknownButton(2))
        );

        handle.done();
    }

    #[test]
    fn poll_reads_the_clock_once_per_call() {
        let calls = Cell::new(0u32);
        let clock = || {
            calls.set(calls.get() + 1);
            100
        };
        let mut buttons: Buttons<PinMock, fn(u8, ButtonEvent), _, 2> = Buttons::new(clock);
        let (first, mut first_handle) = reads(&[MockState::High, MockState::High]);
        let (second, mut second_handle) = reads(&[MockState::High, MockState::High]);

        buttons.add_default_button(1, ignore, first).unwrap();
        buttons.add_default_button(2, ignore, second).unwrap();
        assert_eq!(calls.get(), 2);

        buttons.poll();
        assert_eq!(calls.get(), 3);

        first_handle.done();
        second_handle.done();
    }

    #[test]
    fn settings_are_tunable_before_polling() {
        let clock = || 0u32;
        let mut buttons: Registry<'_, 1> = Buttons::new(&clock);
        buttons.settings_mut().long_press_ms = 1500;
        assert_eq!(buttons.settings().long_press_ms, 1500);
        assert_eq!(buttons.settings().longest_press_ms, 10_000);
    }

    #[test]
    fn invalid_settings_are_kept() {
        let clock = || 0u32;
        let settings = ButtonSettings {
            long_press_ms: 20_000,
            ..Default::default()
        };
        let buttons: Registry<'_, 1> = Buttons::with_settings(&clock, settings);
        assert_eq!(buttons.settings(), &settings);
        assert!(buttons.is_empty());
    }
}
