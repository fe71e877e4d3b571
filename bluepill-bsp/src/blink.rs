use stm32ral::gpio;

use crate::delay::DelaySource;
use crate::gpio::GpioRegisters;
use crate::led::Led;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    High,
    Low,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Phase::High => Phase::Low,
            Phase::Low => Phase::High,
        }
    }
}

/// Toggles an LED forever, `high_ms` on and `low_ms` off.
pub struct Blinker<D: DelaySource, G: GpioRegisters = gpio::Instance> {
    led: Led<G>,
    delay: D,
    high_ms: u32,
    low_ms: u32,
    phase: Phase,
}

impl<D: DelaySource, G: GpioRegisters> Blinker<D, G> {
    pub fn new(led: Led<G>, delay: D, high_ms: u32, low_ms: u32) -> Self {
        Blinker {
            led,
            delay,
            high_ms,
            low_ms,
            phase: Phase::High,
        }
    }

    /// Phase the next `step` will run.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Drive the pin for the current phase, wait it out and move on.
    pub fn step(&mut self) {
        let ms = match self.phase {
            Phase::High => {
                self.led.on();
                self.high_ms
            }
            Phase::Low => {
                self.led.off();
                self.low_ms
            }
        };
        self.delay.wait_ms(ms);
        self.phase = self.phase.next();
    }

    pub fn run_forever(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    pub fn free(self) -> (Led<G>, D) {
        (self.led, self.delay)
    }
}
