//! button.rs — debounced press/gesture classifier for one digital input
//!
//! A [`Button`] samples its pin once per tick, confirms a level change after
//! `debounce_ticks` agreeing samples and turns confirmed transitions into
//! [`ButtonEvent`]s: instant press/release, short, long, longest, double and
//! repeated presses.

use bitflags::bitflags;
use embedded_hal::digital::{InputPin, PinState};

use super::{ButtonEvent, ButtonOptions, ButtonSettings};
use crate::clock::elapsed_ms;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct StateFlags: u8 {
        /// A double press was reported for the pending press.
        const DOUBLE = 0x01;
        /// Short presses repeat while held.
        const REPEAT = 0x02;
        /// A confirmed press has not been classified yet.
        const PENDING = 0x04;
        /// Longest press already reported for this hold.
        const LONGEST = 0x08;
        /// The last confirmed transition was a release.
        const RELEASED = 0x10;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Debounce {
    /// Agreeing samples since the last raw change, at most `debounce_ticks`.
    Counting(u8),
    /// Nothing left to confirm or classify; only repeats are serviced.
    Settled,
}

/// Debounce and gesture state for one input line.
///
/// The pin must already be configured as an input (with pull-up when the
/// button idles HIGH). `on_event` runs synchronously from [`Button::poll`]
/// and must return quickly.
pub struct Button<P, F> {
    pin: P,
    on_event: F,
    id: u8,
    options: ButtonOptions,
    idle_level: PinState,
    /// Last raw sample.
    level: PinState,
    /// Last confirmed level.
    stable_level: PinState,
    debounce: Debounce,
    flags: StateFlags,
    last_check: u32,
    last_press: u32,
    last_change: u32,
    last_repeat: u32,
}

impl<P, F> Button<P, F>
where
    P: InputPin,
    F: FnMut(u8, ButtonEvent),
{
    /// Create a button and seed it with the current pin level.
    ///
    /// `now` is the current clock reading in milliseconds.
    pub fn new(
        id: u8,
        mut pin: P,
        options: ButtonOptions,
        on_event: F,
        settings: &ButtonSettings,
        now: u32,
    ) -> Self {
        let idle_level = options.idle_level();
        let level = match read_level(&mut pin) {
            Ok(level) => level,
            Err(_) => {
                warn!("button {=u8}: initial read failed, assuming idle", id);
                idle_level
            }
        };

        // Sits one long press ahead so the first poll always samples.
        let first_check = now.wrapping_add(settings.long_press_ms);

        Self {
            pin,
            on_event,
            id,
            options,
            idle_level,
            level,
            stable_level: level,
            debounce: Debounce::Settled,
            flags: StateFlags::empty(),
            last_check: first_check,
            last_press: now,
            last_change: now,
            last_repeat: now,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn options(&self) -> ButtonOptions {
        self.options
    }

    pub fn idle_level(&self) -> PinState {
        self.idle_level
    }

    /// Replace the event handler.
    pub fn set_handler(&mut self, on_event: F) {
        self.on_event = on_event;
    }

    /// Returns true if the pin currently reads the idle level.
    ///
    /// Reads the pin directly, bypassing debounce. A failed read reports idle.
    pub fn is_idle(&mut self) -> bool {
        let idle_level = self.idle_level;
        read_level(&mut self.pin).map_or(true, |level| level == idle_level)
    }

    /// Advance the state machine to `now`.
    ///
    /// Does nothing until more than `tick_ms` has passed since the last
    /// sample. May invoke the handler several times.
    pub fn poll(&mut self, now: u32, settings: &ButtonSettings) {
        if elapsed_ms(now, self.last_check) <= settings.tick_ms {
            return;
        }
        self.last_check = now;

        let level = match read_level(&mut self.pin) {
            Ok(level) => level,
            Err(_) => {
                warn!("button {=u8}: input read failed, tick skipped", self.id);
                return;
            }
        };

        if level != self.level {
            self.level = level;
            self.debounce = Debounce::Counting(0);
            return;
        }

        match self.debounce {
            Debounce::Counting(count) if count < settings.debounce_ticks => {
                self.debounce = Debounce::Counting(count + 1);
            }
            Debounce::Counting(_) => self.confirm(now, settings),
            Debounce::Settled => self.service_repeat(now, settings),
        }
    }

    /// Runs on every tick once the raw level has been stable for
    /// `debounce_ticks` samples, until the level is settled.
    fn confirm(&mut self, now: u32, settings: &ButtonSettings) {
        let since_change = elapsed_ms(now, self.last_change);

        if since_change > settings.holdoff_ms && self.level != self.stable_level {
            if self.level == self.idle_level {
                self.emit_if(ButtonOptions::RELEASE, ButtonEvent::Released);
                self.flags.remove(StateFlags::REPEAT);
                self.flags.insert(StateFlags::RELEASED);
            } else {
                let double = self.options.contains(ButtonOptions::DOUBLE)
                    && self.flags.contains(StateFlags::RELEASED)
                    && since_change < settings.double_press_ms;
                // A press still waiting out the double window is reported
                // before the press that closed it.
                if !double && self.flags.contains(StateFlags::PENDING) {
                    self.finish_press(settings);
                }
                self.emit_if(ButtonOptions::PRESS, ButtonEvent::Pressed);
                if double {
                    self.emit(ButtonEvent::PressDouble);
                    self.flags.insert(StateFlags::DOUBLE);
                }
                self.flags.insert(StateFlags::PENDING);
                self.flags.remove(StateFlags::LONGEST | StateFlags::RELEASED);
                self.last_press = now;
            }
            self.stable_level = self.level;
            self.last_change = now;
        }

        // Still waiting for holdoff.
        if self.level != self.stable_level {
            return;
        }

        let settled = if self.level == self.idle_level {
            self.classify_release(now, settings)
        } else {
            self.classify_hold(now, settings)
        };
        if settled {
            self.debounce = Debounce::Settled;
        }
    }

    /// Classify the pending press after release. Returns true once done.
    ///
    /// A short press waits until the double window after its release has
    /// closed, so a second press can still turn it into a double.
    fn classify_release(&mut self, now: u32, settings: &ButtonSettings) -> bool {
        if !self.flags.contains(StateFlags::PENDING) {
            return true;
        }

        let double_window_open = self.options.contains(ButtonOptions::DOUBLE)
            && !self.flags.contains(StateFlags::DOUBLE)
            && self.held_ms() < settings.long_press_ms
            && elapsed_ms(now, self.last_change) < settings.double_press_ms;
        if double_window_open {
            return false;
        }

        self.finish_press(settings);
        true
    }

    /// Report the pending press by how long it was held, from confirmed
    /// press to confirmed release.
    fn finish_press(&mut self, settings: &ButtonSettings) {
        let held = self.held_ms();
        if held < settings.longest_press_ms {
            if held < settings.long_press_ms {
                if !self.flags.contains(StateFlags::DOUBLE) {
                    self.emit_if(ButtonOptions::SHORT, ButtonEvent::PressShort);
                }
            } else if held > settings.long_press_ms {
                self.emit_if(ButtonOptions::LONG, ButtonEvent::PressLong);
            }
        }
        self.flags.remove(StateFlags::PENDING | StateFlags::DOUBLE);
    }

    fn held_ms(&self) -> u32 {
        elapsed_ms(self.last_change, self.last_press)
    }

    /// Classify a press that is still held. Returns true once the hold has
    /// been consumed by a longest press or by repeating.
    fn classify_hold(&mut self, now: u32, settings: &ButtonSettings) -> bool {
        if !self.flags.contains(StateFlags::PENDING) {
            return true;
        }

        let since_press = elapsed_ms(now, self.last_press);

        if since_press > settings.longest_press_ms {
            if !self.flags.contains(StateFlags::LONGEST) {
                self.emit_if(ButtonOptions::LONGEST, ButtonEvent::PressLongest);
            }
            self.flags.insert(StateFlags::LONGEST);
            if self.options.contains(ButtonOptions::REPEAT) {
                self.start_repeat(now);
            }
        } else if since_press > settings.long_press_ms
            && self.options.contains(ButtonOptions::REPEAT)
        {
            self.emit(ButtonEvent::PressShort);
            self.start_repeat(now);
        } else {
            return false;
        }

        self.flags.remove(StateFlags::PENDING | StateFlags::DOUBLE);
        true
    }

    fn service_repeat(&mut self, now: u32, settings: &ButtonSettings) {
        if self.level == self.idle_level || !self.flags.contains(StateFlags::REPEAT) {
            return;
        }

        if self.options.contains(ButtonOptions::LONGEST)
            && !self.flags.contains(StateFlags::LONGEST)
            && elapsed_ms(now, self.last_press) > settings.longest_press_ms
        {
            self.emit(ButtonEvent::PressLongest);
            self.flags.insert(StateFlags::LONGEST);
        }

        if elapsed_ms(now, self.last_repeat) > settings.repeat_ms {
            self.emit(ButtonEvent::PressShort);
            self.last_repeat = now;
        }
    }

    fn start_repeat(&mut self, now: u32) {
        self.flags.insert(StateFlags::REPEAT);
        self.last_repeat = now;
    }

    fn emit_if(&mut self, option: ButtonOptions, event: ButtonEvent) {
        if self.options.contains(option) {
            self.emit(event);
        }
    }

    fn emit(&mut self, event: ButtonEvent) {
        trace!("button {=u8}: {}", self.id, event);
        (self.on_event)(self.id, event);
    }
}

fn read_level<P: InputPin>(pin: &mut P) -> Result<PinState, P::Error> {
    pin.is_high().map(PinState::from)
}
