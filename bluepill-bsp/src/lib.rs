//! Register-level support for the STM32F103 "Blue Pill" board.
//!
//! Every peripheral is reached through a small register trait, implemented
//! for the `stm32ral` instances on hardware and by `sim` in host tests.

#![cfg_attr(not(test), no_std)]

pub use cortex_m;
pub use embedded_hal;
pub use stm32ral;

pub mod blink;
pub mod delay;
pub mod gpio;
pub mod led;
pub mod rcc;

#[cfg(test)]
mod sim;
