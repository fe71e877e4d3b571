use bluepill_bsp as bsp;
use bsp::blink::Blinker;
use bsp::gpio::Port;
use bsp::led::Led;
use bsp::rcc::RCC;
use rtt_target::rprintln;

#[cfg(not(feature = "systick-delay"))]
use bsp::delay::BusyWait;
#[cfg(feature = "systick-delay")]
use bsp::delay::SysTickDelay;

use crate::config;
use stm32ral::gpio;

/// Claim the register block of `port`.
fn take_port(port: Port) -> Option<gpio::Instance> {
    match port {
        Port::A => gpio::GPIOA::take(),
        Port::B => gpio::GPIOB::take(),
        Port::C => gpio::GPIOC::take(),
        Port::D => gpio::GPIOD::take(),
        Port::E => gpio::GPIOE::take(),
    }
}

pub struct App {
    rcc: RCC,
}

impl App {
    pub fn new(rcc: RCC) -> Self {
        App { rcc }
    }

    /// Configure the LED pin and hand control to the blink loop.
    ///
    /// Claims the LED port register block, so this can only run once.
    pub fn run(&self) -> ! {
        let regs = take_port(config::LED.port).unwrap();
        let led = Led::init(&self.rcc, regs, config::LED);
        rprintln!("LED on P{:?}{} configured", config::LED.port, config::LED.n);

        #[cfg(not(feature = "systick-delay"))]
        let delay = {
            rprintln!("Busy-wait delay, {} loops/ms", config::LOOPS_PER_MS);
            BusyWait::new(config::LOOPS_PER_MS)
        };
        #[cfg(feature = "systick-delay")]
        let delay = {
            rprintln!("SysTick delay, {} Hz", config::SYSCLK_HZ);
            SysTickDelay::new(stm32ral::syst::SYST::take().unwrap(), config::SYSCLK_HZ)
        };

        rprintln!("Blinking {} ms on / {} ms off", config::HIGH_MS, config::LOW_MS);
        Blinker::new(led, delay, config::HIGH_MS, config::LOW_MS).run_forever()
    }
}
