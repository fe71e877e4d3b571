use embedded_hal::blocking::delay::DelayMs;
use stm32ral::syst;
use stm32ral::{modify_reg, read_reg, write_reg};

/// Something that can block the caller for a number of milliseconds.
pub trait DelaySource {
    fn wait_ms(&mut self, ms: u32);
}

/// Inner loop passes per millisecond at the 8 MHz HSI reset clock, release
/// build. Each pass is about two cycles; recalibrate when either changes.
pub const HSI_LOOPS_PER_MS: u32 = 0xFFF;

/// Run `ms` outer passes of `loops_per_ms` inner passes, calling `pause` once
/// per inner pass. Returns the number of inner passes executed.
#[inline(always)]
pub fn spin<F: FnMut()>(ms: u32, loops_per_ms: u32, mut pause: F) -> u64 {
    let mut passes = 0u64;
    for _ in 0..ms {
        let mut j = 0;
        while j < loops_per_ms {
            pause();
            j += 1;
        }
        passes += loops_per_ms as u64;
    }
    passes
}

#[inline(always)]
fn nop() {
    #[cfg(target_arch = "arm")]
    cortex_m::asm::nop();
    #[cfg(not(target_arch = "arm"))]
    core::hint::spin_loop();
}

/// Busy-wait delay counted in instructions, no timer involved.
///
/// Accuracy depends entirely on the calibration constant, the core clock and
/// the optimisation level.
pub struct BusyWait {
    loops_per_ms: u32,
}

impl BusyWait {
    pub fn new(loops_per_ms: u32) -> Self {
        assert!(loops_per_ms > 0);
        BusyWait { loops_per_ms }
    }

    pub fn loops_per_ms(&self) -> u32 {
        self.loops_per_ms
    }
}

impl DelaySource for BusyWait {
    fn wait_ms(&mut self, ms: u32) {
        spin(ms, self.loops_per_ms, nop);
    }
}

impl DelayMs<u32> for BusyWait {
    fn delay_ms(&mut self, ms: u32) {
        self.wait_ms(ms);
    }
}

const SYST_CSR_ENABLE: u32 = 1 << 0;
const SYST_CSR_CLKSOURCE: u32 = 1 << 2;
const SYST_RELOAD_MAX: u32 = 0xff_ffff;

/// The parts of SysTick the delay needs.
pub trait SysTickRegisters {
    /// Free run from the processor clock with the largest reload value.
    fn start(&self);
    /// Current value of the 24-bit down counter.
    fn current(&self) -> u32;
}

impl SysTickRegisters for syst::Instance {
    fn start(&self) {
        // Set clock source to processor clock
        modify_reg!(syst, self, CSR, |r| (r | SYST_CSR_CLKSOURCE));

        // Set reload and current values
        write_reg!(syst, self, RVR, SYST_RELOAD_MAX);
        write_reg!(syst, self, CVR, 0);

        // Enable the counter
        modify_reg!(syst, self, CSR, |r| (r | SYST_CSR_ENABLE));
    }

    #[inline(always)]
    fn current(&self) -> u32 {
        read_reg!(syst, self, CVR)
    }
}

/// Delay backed by the SysTick timer.
pub struct SysTickDelay<S: SysTickRegisters = syst::Instance> {
    systick: S,
    ticks_per_ms: u32,
}

impl<S: SysTickRegisters> SysTickDelay<S> {
    pub fn new(systick: S, hclk: u32) -> Self {
        let ticks_per_ms = hclk / 1_000;
        assert!(ticks_per_ms > 0 && ticks_per_ms <= SYST_RELOAD_MAX);
        systick.start();
        SysTickDelay { systick, ticks_per_ms }
    }

    pub fn ticks_per_ms(&self) -> u32 {
        self.ticks_per_ms
    }

    pub fn delay_ticks(&self, mut ticks: u32) {
        let mut last = self.systick.current();
        loop {
            let now = self.systick.current();
            let delta = last.wrapping_sub(now) & SYST_RELOAD_MAX;

            if delta >= ticks {
                break;
            } else {
                ticks -= delta;
                last = now;
            }
        }
    }

    pub fn free(self) -> S {
        self.systick
    }
}

impl<S: SysTickRegisters> DelaySource for SysTickDelay<S> {
    fn wait_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_ticks(self.ticks_per_ms);
        }
    }
}

impl<S: SysTickRegisters> DelayMs<u32> for SysTickDelay<S> {
    fn delay_ms(&mut self, ms: u32) {
        self.wait_ms(ms);
    }
}
