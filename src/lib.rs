#![no_std]

#[macro_use]
mod fmt;

mod clock;
mod peripherals;

pub use clock::*;
pub use peripherals::*;
