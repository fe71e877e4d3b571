#![no_std]
#![no_main]

mod app;
mod config;

use panic_rtt_target as _;
use cortex_m_rt::entry;
use git_version::git_version;
use rtt_target::{rtt_init_print, rprintln};
use bluepill_bsp::rcc::RCC;

const GIT_VERSION: &str = git_version!(args = ["--always", "--dirty=-modified"], fallback = "unknown");

#[entry]
fn main() -> ! {
    rtt_init_print!();

    rprintln!("bluepill-blinky {} starting...", GIT_VERSION);

    let rcc = RCC::new(stm32ral::rcc::RCC::take().unwrap());
    let app = app::App::new(rcc);
    app.run()
}
