//! Build-time board selection.

use bluepill_bsp::gpio::{PinId, Port};

/// On-board LED of the Blue Pill.
pub const LED: PinId = PinId::new(Port::C, 13);

pub const HIGH_MS: u32 = 300;
pub const LOW_MS: u32 = 300;

/// Core clock straight out of reset (HSI, no PLL).
pub const SYSCLK_HZ: u32 = 8_000_000;

/// Busy-wait calibration for `SYSCLK_HZ`.
pub const LOOPS_PER_MS: u32 = bluepill_bsp::delay::HSI_LOOPS_PER_MS;
