//! Host-side model of the RCC clock gates and the STM32F1 GPIO ports.
//!
//! Registers start at their reset values, every access is logged, and a
//! port whose clock is gated reads as zero and drops writes.

use core::cell::{Cell, RefCell};

use crate::gpio::{ConfigReg, GpioRegisters, Port};
use crate::rcc::RccRegisters;

const PORTS: usize = 5;
const CR_RESET: u32 = 0x4444_4444;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reg {
    Apb2enr,
    Cr(Port, ConfigReg),
    Idr(Port),
    Odr(Port),
    Bsrr(Port),
    Brr(Port),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Read(Reg),
    Write(Reg, u32),
}

impl Access {
    pub fn is_read_of(&self, reg: Reg) -> bool {
        *self == Access::Read(reg)
    }

    pub fn is_write_of(&self, reg: Reg) -> bool {
        matches!(*self, Access::Write(r, _) if r == reg)
    }

    pub fn reg(&self) -> Reg {
        match *self {
            Access::Read(r) | Access::Write(r, _) => r,
        }
    }

    pub fn value(&self) -> Option<u32> {
        match *self {
            Access::Write(_, v) => Some(v),
            Access::Read(_) => None,
        }
    }
}

#[derive(Default)]
struct PortState {
    crl: Cell<u32>,
    crh: Cell<u32>,
    odr: Cell<u32>,
}

pub struct SimChip {
    apb2enr: Cell<u32>,
    ports: [PortState; PORTS],
    log: RefCell<Vec<Access>>,
}

impl SimChip {
    pub fn new() -> Self {
        let chip = SimChip {
            apb2enr: Cell::new(0),
            ports: Default::default(),
            log: RefCell::new(Vec::new()),
        };
        for p in chip.ports.iter() {
            p.crl.set(CR_RESET);
            p.crh.set(CR_RESET);
        }
        chip
    }

    pub fn rcc(&self) -> SimRcc<'_> {
        SimRcc { chip: self }
    }

    pub fn gpio(&self, port: Port) -> SimGpio<'_> {
        SimGpio { chip: self, port }
    }

    /// Drain the access log.
    pub fn take_log(&self) -> Vec<Access> {
        self.log.replace(Vec::new())
    }

    pub fn peek_apb2enr(&self) -> u32 {
        self.apb2enr.get()
    }

    pub fn poke_apb2enr(&self, value: u32) {
        self.apb2enr.set(value);
    }

    pub fn peek_cr(&self, port: Port, reg: ConfigReg) -> u32 {
        self.cr(port, reg).get()
    }

    /// Backdoor write, bypasses the clock gate and the log.
    pub fn poke_cr(&self, port: Port, reg: ConfigReg, value: u32) {
        self.cr(port, reg).set(value);
    }

    pub fn peek_odr(&self, port: Port) -> u32 {
        self.ports[port as usize].odr.get()
    }

    fn cr(&self, port: Port, reg: ConfigReg) -> &Cell<u32> {
        let p = &self.ports[port as usize];
        match reg {
            ConfigReg::Low => &p.crl,
            ConfigReg::High => &p.crh,
        }
    }

    fn clocked(&self, port: Port) -> bool {
        self.apb2enr.get() & port.enable_bit() != 0
    }

    fn record(&self, access: Access) {
        self.log.borrow_mut().push(access);
    }
}

impl Default for SimChip {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SimRcc<'a> {
    chip: &'a SimChip,
}

impl RccRegisters for SimRcc<'_> {
    fn read_apb2enr(&self) -> u32 {
        self.chip.record(Access::Read(Reg::Apb2enr));
        self.chip.apb2enr.get()
    }

    fn modify_apb2enr(&self, mask: u32, value: u32) {
        let r = self.read_apb2enr();
        let w = (r & !mask) | (value & mask);
        self.chip.record(Access::Write(Reg::Apb2enr, w));
        self.chip.apb2enr.set(w);
    }
}

pub struct SimGpio<'a> {
    chip: &'a SimChip,
    port: Port,
}

impl SimGpio<'_> {
    fn read(&self, reg: Reg, cell: &Cell<u32>) -> u32 {
        self.chip.record(Access::Read(reg));
        if self.chip.clocked(self.port) {
            cell.get()
        } else {
            0
        }
    }

    fn write(&self, reg: Reg, value: u32, apply: impl FnOnce()) {
        self.chip.record(Access::Write(reg, value));
        if self.chip.clocked(self.port) {
            apply();
        }
    }

    fn odr(&self) -> &Cell<u32> {
        &self.chip.ports[self.port as usize].odr
    }
}

impl GpioRegisters for SimGpio<'_> {
    fn port(&self) -> Port {
        self.port
    }

    fn read_cr(&self, reg: ConfigReg) -> u32 {
        self.read(Reg::Cr(self.port, reg), self.chip.cr(self.port, reg))
    }

    fn modify_cr(&self, reg: ConfigReg, mask: u32, value: u32) {
        let r = self.read_cr(reg);
        let w = (r & !mask) | (value & mask);
        let cell = self.chip.cr(self.port, reg);
        self.write(Reg::Cr(self.port, reg), w, || cell.set(w));
    }

    // Pins are assumed unloaded, so the input stage sees the driven level.
    fn read_idr(&self) -> u32 {
        self.read(Reg::Idr(self.port), self.odr())
    }

    fn read_odr(&self) -> u32 {
        self.read(Reg::Odr(self.port), self.odr())
    }

    fn write_bsrr(&self, bits: u32) {
        let odr = self.odr();
        self.write(Reg::Bsrr(self.port), bits, || {
            let set = bits & 0xFFFF;
            let reset = (bits >> 16) & 0xFFFF;
            odr.set((odr.get() | set) & !reset);
        });
    }

    fn write_brr(&self, bits: u32) {
        let odr = self.odr();
        self.write(Reg::Brr(self.port), bits, || odr.set(odr.get() & !(bits & 0xFFFF)));
    }
}
