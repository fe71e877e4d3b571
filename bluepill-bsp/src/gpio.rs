use stm32ral::gpio;
use stm32ral::{read_reg, write_reg, modify_reg};

/// GPIO ports present on the STM32F103 medium density parts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    /// IOPxEN bit of this port in `RCC_APB2ENR`.
    pub const fn enable_bit(self) -> u32 {
        match self {
            Port::A => 1 << 2,
            Port::B => 1 << 3,
            Port::C => 1 << 4,
            Port::D => 1 << 5,
            Port::E => 1 << 6,
        }
    }

    /// Start of the port's register block.
    pub const fn base_address(self) -> u32 {
        GPIOA_BASE + (self as u32) * GPIO_STRIDE
    }

    pub const fn from_base_address(addr: u32) -> Option<Self> {
        match addr {
            0x4001_0800 => Some(Port::A),
            0x4001_0C00 => Some(Port::B),
            0x4001_1000 => Some(Port::C),
            0x4001_1400 => Some(Port::D),
            0x4001_1800 => Some(Port::E),
            _ => None,
        }
    }
}

const GPIOA_BASE: u32 = 0x4001_0800;
const GPIO_STRIDE: u32 = 0x400;

/// A pin selected at build time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PinId {
    pub port: Port,
    pub n: u8,
}

impl PinId {
    /// Fails to compile when used in a `const` with `n >= 16`.
    pub const fn new(port: Port, n: u8) -> Self {
        assert!(n < 16);
        PinId { port, n }
    }
}

/// Which of the two port configuration registers holds a pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigReg {
    /// CRL, pins 0 to 7
    Low,
    /// CRH, pins 8 to 15
    High,
}

impl ConfigReg {
    pub const fn of(n: u8) -> Self {
        if n < 8 {
            ConfigReg::Low
        } else {
            ConfigReg::High
        }
    }
}

/// Raw register access for one GPIO port.
///
/// CRL and CRH are shared by eight pins each, so they can only be changed
/// through a masked modify. BSRR and BRR are write-only and are written
/// whole, which makes set and reset atomic.
pub trait GpioRegisters {
    /// Port this register block belongs to.
    fn port(&self) -> Port;
    fn read_cr(&self, reg: ConfigReg) -> u32;
    fn modify_cr(&self, reg: ConfigReg, mask: u32, value: u32);
    fn read_idr(&self) -> u32;
    fn read_odr(&self) -> u32;
    fn write_bsrr(&self, bits: u32);
    fn write_brr(&self, bits: u32);
}

impl GpioRegisters for gpio::Instance {
    fn port(&self) -> Port {
        let addr = &**self as *const gpio::RegisterBlock as usize as u32;
        match Port::from_base_address(addr) {
            Some(port) => port,
            None => panic!("no GPIO port at {:#010x}", addr),
        }
    }

    fn read_cr(&self, reg: ConfigReg) -> u32 {
        match reg {
            ConfigReg::Low => read_reg!(gpio, self, CRL),
            ConfigReg::High => read_reg!(gpio, self, CRH),
        }
    }

    fn modify_cr(&self, reg: ConfigReg, mask: u32, value: u32) {
        match reg {
            ConfigReg::Low => modify_reg!(gpio, self, CRL, |r| (r & !mask) | (value & mask)),
            ConfigReg::High => modify_reg!(gpio, self, CRH, |r| (r & !mask) | (value & mask)),
        }
    }

    fn read_idr(&self) -> u32 {
        read_reg!(gpio, self, IDR)
    }

    fn read_odr(&self) -> u32 {
        read_reg!(gpio, self, ODR)
    }

    fn write_bsrr(&self, bits: u32) {
        write_reg!(gpio, self, BSRR, bits);
    }

    fn write_brr(&self, bits: u32) {
        write_reg!(gpio, self, BRR, bits);
    }
}

/// MODEy field values
pub mod mode {
    pub const INPUT: u32 = 0b00;
    pub const OUTPUT_10MHZ: u32 = 0b01;
    pub const OUTPUT_2MHZ: u32 = 0b10;
    pub const OUTPUT_50MHZ: u32 = 0b11;
}

/// CNFy field values for the output modes
pub mod cnf {
    pub const PUSH_PULL: u32 = 0b00;
    pub const OPEN_DRAIN: u32 = 0b01;
    pub const ALT_PUSH_PULL: u32 = 0b10;
    pub const ALT_OPEN_DRAIN: u32 = 0b11;

    /// Input mode, floating (reset value)
    pub const FLOATING: u32 = 0b01;
}

pub struct GPIO<G: GpioRegisters = gpio::Instance> {
    p: G,
    port: Port,
}

impl<'a, G: GpioRegisters> GPIO<G> {
    /// Only called by `RCC::enable_gpio` once the port clock runs.
    pub(crate) fn new(p: G) -> Self {
        let port = p.port();
        GPIO { p, port }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn pin(&'a self, n: u8) -> Pin<'a, G> {
        assert!(n < 16);
        Pin { n, port: self }
    }

    pub fn set_high(&'a self, n: u8) -> &Self {
        assert!(n < 16);
        self.p.write_bsrr(1 << n);
        self
    }

    pub fn set_low(&'a self, n: u8) -> &Self {
        assert!(n < 16);
        self.p.write_brr(1 << n);
        self
    }

    pub fn set_mode(&'a self, n: u8, mode: u32) -> &Self {
        assert!(n < 16);
        let offset = (n % 8) * 4;
        let mask = 0b11 << offset;
        let val = (mode << offset) & mask;
        self.p.modify_cr(ConfigReg::of(n), mask, val);
        self
    }

    pub fn set_mode_input(&'a self, n: u8) -> &Self {
        self.set_mode(n, mode::INPUT)
    }

    pub fn set_mode_output_2mhz(&'a self, n: u8) -> &Self {
        self.set_mode(n, mode::OUTPUT_2MHZ)
    }

    pub fn set_mode_output_10mhz(&'a self, n: u8) -> &Self {
        self.set_mode(n, mode::OUTPUT_10MHZ)
    }

    pub fn set_mode_output_50mhz(&'a self, n: u8) -> &Self {
        self.set_mode(n, mode::OUTPUT_50MHZ)
    }

    pub fn set_cnf(&'a self, n: u8, cnf: u32) -> &Self {
        assert!(n < 16);
        let offset = (n % 8) * 4 + 2;
        let mask = 0b11 << offset;
        let val = (cnf << offset) & mask;
        self.p.modify_cr(ConfigReg::of(n), mask, val);
        self
    }

    pub fn set_cnf_pushpull(&'a self, n: u8) -> &Self {
        self.set_cnf(n, cnf::PUSH_PULL)
    }

    pub fn set_cnf_opendrain(&'a self, n: u8) -> &Self {
        self.set_cnf(n, cnf::OPEN_DRAIN)
    }

    pub fn set_cnf_floating(&'a self, n: u8) -> &Self {
        self.set_cnf(n, cnf::FLOATING)
    }

    /// Current 4-bit CNF:MODE nibble of a pin.
    pub fn get_config(&'a self, n: u8) -> u32 {
        assert!(n < 16);
        let offset = (n % 8) * 4;
        (self.p.read_cr(ConfigReg::of(n)) >> offset) & 0b1111
    }

    pub fn get_idr(&'a self) -> u32 {
        self.p.read_idr()
    }

    pub fn get_odr(&'a self) -> u32 {
        self.p.read_odr()
    }

    pub fn get_pin_odr(&'a self, n: u8) -> u32 {
        (self.get_odr() & (1 << n)) >> n
    }
}

#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PinState {
    Low = 0,
    High = 1,
}

pub struct Pin<'a, G: GpioRegisters = gpio::Instance> {
    n: u8,
    port: &'a GPIO<G>,
}

impl<'a, G: GpioRegisters> Pin<'a, G> {
    pub fn n(&self) -> u8 {
        self.n
    }

    pub fn set_high(&self) -> &Self {
        self.port.set_high(self.n);
        self
    }

    pub fn set_low(&self) -> &Self {
        self.port.set_low(self.n);
        self
    }

    pub fn set_state(&self, state: PinState) {
        match state {
            PinState::Low => self.set_low(),
            PinState::High => self.set_high(),
        };
    }

    /// Level last written to the output data register.
    pub fn get_output_state(&self) -> PinState {
        match self.port.get_pin_odr(self.n) {
            0 => PinState::Low,
            1 => PinState::High,
            _ => unreachable!(),
        }
    }

    pub fn set_mode_input(&self) -> &Self {
        self.port.set_mode_input(self.n);
        self
    }

    pub fn set_mode_output_2mhz(&self) -> &Self {
        self.port.set_mode_output_2mhz(self.n);
        self
    }

    pub fn set_mode_output_10mhz(&self) -> &Self {
        self.port.set_mode_output_10mhz(self.n);
        self
    }

    pub fn set_mode_output_50mhz(&self) -> &Self {
        self.port.set_mode_output_50mhz(self.n);
        self
    }

    pub fn set_cnf_pushpull(&self) -> &Self {
        self.port.set_cnf_pushpull(self.n);
        self
    }

    pub fn set_cnf_opendrain(&self) -> &Self {
        self.port.set_cnf_opendrain(self.n);
        self
    }

    pub fn set_cnf_floating(&self) -> &Self {
        self.port.set_cnf_floating(self.n);
        self
    }

    pub fn get_config(&self) -> u32 {
        self.port.get_config(self.n)
    }
}
