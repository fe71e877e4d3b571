use stm32ral::rcc;
use stm32ral::{read_reg, modify_reg};

use crate::gpio::{GPIO, GpioRegisters, Port};

/// Clock gate registers of the reset and clock control block.
///
/// Only masked read-modify-write access is offered; `APB2ENR` also gates
/// AFIO, the ADCs, TIM1, SPI1 and USART1.
pub trait RccRegisters {
    fn read_apb2enr(&self) -> u32;
    fn modify_apb2enr(&self, mask: u32, value: u32);
}

impl RccRegisters for rcc::Instance {
    fn read_apb2enr(&self) -> u32 {
        read_reg!(rcc, self, APB2ENR)
    }

    fn modify_apb2enr(&self, mask: u32, value: u32) {
        modify_reg!(rcc, self, APB2ENR, |r| (r & !mask) | (value & mask));
    }
}

pub struct RCC<R: RccRegisters = rcc::Instance> {
    rcc: R,
}

impl<R: RccRegisters> RCC<R> {
    pub fn new(rcc: R) -> Self {
        RCC { rcc }
    }

    /// Ungate the clock of the port behind `regs` and hand out its driver.
    ///
    /// The port registers ignore writes and read as zero until the clock
    /// is running, so this is the only way to construct a `GPIO`.
    pub fn enable_gpio<G: GpioRegisters>(&self, regs: G) -> GPIO<G> {
        let bit = regs.port().enable_bit();
        self.rcc.modify_apb2enr(bit, bit);
        GPIO::new(regs)
    }

    pub fn is_gpio_enabled(&self, port: Port) -> bool {
        self.rcc.read_apb2enr() & port.enable_bit() != 0
    }
}
