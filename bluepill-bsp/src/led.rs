use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;
use stm32ral::gpio;

use crate::gpio::{GPIO, GpioRegisters, PinId, PinState};
use crate::rcc::{RCC, RccRegisters};

/// A single push-pull LED output.
pub struct Led<G: GpioRegisters = gpio::Instance> {
    port: GPIO<G>,
    n: u8,
}

impl<G: GpioRegisters> Led<G> {
    /// Bring `id` out of reset as a push-pull output, 10 MHz slew.
    ///
    /// The port clock is ungated first. MODE and CNF are updated with two
    /// separate masked writes, so the other pins sharing the configuration
    /// register keep their settings. The output level is left alone (low
    /// after reset).
    ///
    /// Panics before touching any register if `regs` is not the block of
    /// `id.port`.
    pub fn init<R: RccRegisters>(rcc: &RCC<R>, regs: G, id: PinId) -> Self {
        assert_eq!(regs.port(), id.port, "register block does not match LED port");
        let port = rcc.enable_gpio(regs);
        port.pin(id.n)
            .set_mode_output_10mhz()
            .set_cnf_pushpull();
        Led { port, n: id.n }
    }

    /// Re-apply the output configuration.
    pub fn reconfigure(&self) {
        self.port.pin(self.n)
            .set_mode_output_10mhz()
            .set_cnf_pushpull();
    }

    pub fn on(&self) {
        self.port.set_high(self.n);
    }

    pub fn off(&self) {
        self.port.set_low(self.n);
    }

    pub fn set(&self, state: PinState) {
        self.port.pin(self.n).set_state(state);
    }

    pub fn is_on(&self) -> bool {
        self.state() == PinState::High
    }

    pub fn state(&self) -> PinState {
        self.port.pin(self.n).get_output_state()
    }

    pub fn id(&self) -> PinId {
        PinId::new(self.port.port(), self.n)
    }

    pub fn free(self) -> GPIO<G> {
        self.port
    }
}

impl<G: GpioRegisters> OutputPin for Led<G> {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.on();
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.off();
        Ok(())
    }
}
