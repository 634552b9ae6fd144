//! button_options.rs — per-button option mask and the events a button reports

use bitflags::bitflags;
use embedded_hal::digital::PinState;

bitflags! {
    /// Which events a button reports, plus its idle polarity.
    ///
    /// Bit values are stable and may be stored or sent as a single byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonOptions: u8 {
        /// Report a short press once the button is released.
        const SHORT = 0x01;
        /// Report a long press once the button is released.
        const LONG = 0x02;
        /// Report an extra long press while the button is still held.
        const LONGEST = 0x04;
        /// Report the confirmed press instantly.
        const PRESS = 0x08;
        /// Report the confirmed release instantly.
        const RELEASE = 0x10;
        /// Report two presses in quick succession as one double press.
        const DOUBLE = 0x20;
        /// Repeat short presses while the button is held.
        const REPEAT = 0x40;
        /// The button idles LOW instead of HIGH.
        const IDLE_LOW = 0x80;
    }
}

impl ButtonOptions {
    /// Level the input sits at while the button is not pressed.
    pub fn idle_level(self) -> PinState {
        if self.contains(Self::IDLE_LOW) {
            PinState::Low
        } else {
            PinState::High
        }
    }
}

impl Default for ButtonOptions {
    fn default() -> Self {
        Self::SHORT | Self::LONG | Self::DOUBLE
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ButtonOptions {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ButtonOptions({=u8:#x})", self.bits())
    }
}

/// Event reported to a button's handler.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Short press, or one repeat pulse while held.
    PressShort = 0x01,
    PressLong = 0x02,
    PressLongest = 0x03,
    PressDouble = 0x04,
    Pressed = 0x05,
    Released = 0x06,
}

impl ButtonEvent {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<ButtonEvent> for u8 {
    fn from(event: ButtonEvent) -> Self {
        event.code()
    }
}
