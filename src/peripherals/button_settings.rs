//! button_settings.rs — timing shared by every button of a registry

/// Time in ms for a long press.
pub const DEFAULT_LONG_PRESS_MS: u32 = 3000;
/// Time in ms for a longest press.
pub const DEFAULT_LONGEST_PRESS_MS: u32 = 10_000;
/// Time in ms between two input samples.
pub const DEFAULT_TICK_MS: u32 = 5;
/// Number of agreeing samples before a level change is accepted.
pub const DEFAULT_DEBOUNCE_TICKS: u8 = 10;
/// Minimum time in ms between two confirmed transitions.
pub const DEFAULT_HOLDOFF_MS: u32 = 120;
/// Window in ms for a second press to count as a double press.
pub const DEFAULT_DOUBLE_PRESS_MS: u32 = 370;
/// Time in ms between repeated short presses while held.
pub const DEFAULT_REPEAT_MS: u32 = 200;

/// Button timing parameters, all in milliseconds except `debounce_ticks`.
///
/// Tune these before the first poll. Values changed while buttons are
/// debouncing take effect on the next tick.
///
/// # Example
///
/// ```
/// use darkpico_buttons::ButtonSettings;
///
/// let settings = ButtonSettings {
///     long_press_ms: 1500,
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSettings {
    /// Hold time for a long press.
    pub long_press_ms: u32,
    /// Hold time for a longest press. Must exceed `long_press_ms`.
    pub longest_press_ms: u32,
    /// Sampling interval. Must be non-zero.
    pub tick_ms: u32,
    /// Samples that must agree before a level change is confirmed.
    pub debounce_ticks: u8,
    /// Minimum spacing of confirmed press/release transitions.
    pub holdoff_ms: u32,
    /// Double press window.
    pub double_press_ms: u32,
    /// Repeat interval while held.
    pub repeat_ms: u32,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            longest_press_ms: DEFAULT_LONGEST_PRESS_MS,
            tick_ms: DEFAULT_TICK_MS,
            debounce_ticks: DEFAULT_DEBOUNCE_TICKS,
            holdoff_ms: DEFAULT_HOLDOFF_MS,
            double_press_ms: DEFAULT_DOUBLE_PRESS_MS,
            repeat_ms: DEFAULT_REPEAT_MS,
        }
    }
}

impl ButtonSettings {
    /// Check the preconditions gesture classification relies on.
    ///
    /// Invalid settings are not rejected by the registry; they only make
    /// the classification meaningless.
    pub fn validate(&self) -> Result<(), ButtonSettingsError> {
        if self.tick_ms == 0 {
            return Err(ButtonSettingsError::ZeroTick);
        }
        if self.long_press_ms >= self.longest_press_ms {
            return Err(ButtonSettingsError::LongPressNotBelowLongest {
                long_press_ms: self.long_press_ms,
                longest_press_ms: self.longest_press_ms,
            });
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonSettingsError {
    #[error("Tick interval must be non-zero")]
    ZeroTick,
    #[error("Long press ({long_press_ms} ms) must be shorter than longest press ({longest_press_ms} ms)")]
    LongPressNotBelowLongest {
        long_press_ms: u32,
        longest_press_ms: u32,
    },
}
