/*++

Licensed under the Apache-2.0 license.

File Name:

    timer_core.rs

Abstract:

    File contains the prescaled free-running timer core.

--*/

use ctkey_emu_bridge::{Access, BridgedCore, CoreStatus, RegisterFile, RegisterMap};
use ctkey_emu_types::consts::timer::*;
use ctkey_emu_types::{RegData, RegisterAddress};
use tock_registers::interfaces::Readable;
use tock_registers::register_bitfields;
use tock_registers::registers::InMemoryRegister;

register_bitfields! [
    u32,

    /// Control Register Fields
    pub Control [
        START OFFSET(0) NUMBITS(1) [],
        STOP OFFSET(1) NUMBITS(1) [],
    ],

    /// Status Register Fields
    pub Status [
        RUNNING OFFSET(0) NUMBITS(1) [],
    ],
];

/// Counter that advances once every `prescaler` cycles while running.
///
/// A prescaler of zero counts like a prescaler of one.
pub struct TimerCore {
    regs: RegisterFile,
    running: bool,
    prescaler_count: u32,
    in_reset: bool,
}

impl Default for TimerCore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerCore {
    pub fn new() -> Self {
        let map = RegisterMap::new()
            .with_region(ADDR_NAME0..=ADDR_VERSION, Access::ReadOnly)
            .with_register(ADDR_CTRL, Access::ReadWrite)
            .with_register(ADDR_STATUS, Access::ReadOnly)
            .with_register(ADDR_PRESCALER, Access::ReadWrite)
            .with_register(ADDR_TIMER, Access::ReadWrite);
        let mut regs = RegisterFile::new(map);
        regs.store_words(ADDR_NAME0, &[CORE_NAME0, CORE_NAME1, CORE_VERSION]);
        Self {
            regs,
            running: false,
            prescaler_count: 0,
            in_reset: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn value(&self) -> RegData {
        self.regs.load(ADDR_TIMER)
    }

    fn on_write_control(&mut self, val: RegData) {
        let control = InMemoryRegister::<u32, Control::Register>::new(val);
        if control.is_set(Control::STOP) {
            if self.running {
                log::debug!("timer: stop at {}", self.value());
            }
            self.running = false;
        } else if control.is_set(Control::START) && !self.running {
            log::debug!(
                "timer: start, prescaler {}",
                self.regs.load(ADDR_PRESCALER)
            );
            self.running = true;
            self.prescaler_count = 0;
        }
    }
}

impl BridgedCore for TimerCore {
    fn name(&self) -> &'static str {
        "timer"
    }

    fn read(&self, addr: RegisterAddress) -> RegData {
        if addr == ADDR_STATUS {
            Status::RUNNING.val(self.running as u32).value
        } else {
            self.regs.read(addr)
        }
    }

    fn write(&mut self, addr: RegisterAddress, val: RegData) {
        if self.regs.write(addr, val) && addr == ADDR_CTRL {
            self.on_write_control(val);
        }
    }

    fn reset(&mut self) {
        self.regs.store(ADDR_CTRL, 0);
        self.regs.store(ADDR_PRESCALER, 0);
        self.running = false;
        self.prescaler_count = 0;
        self.in_reset = true;
    }

    fn tick(&mut self) {
        self.in_reset = false;
        if !self.running {
            return;
        }
        self.prescaler_count += 1;
        if self.prescaler_count >= self.regs.load(ADDR_PRESCALER).max(1) {
            self.prescaler_count = 0;
            let next = self.value().wrapping_add(1);
            self.regs.store(ADDR_TIMER, next);
        }
    }

    fn status(&self) -> CoreStatus {
        CoreStatus {
            ready: !self.in_reset,
            valid: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(timer: &mut TimerCore) {
        timer.write(ADDR_CTRL, Control::START::SET.value);
        timer.tick();
    }

    #[test]
    fn test_identity() {
        let timer = TimerCore::new();
        assert_eq!(timer.read(ADDR_NAME0), 0x74696d65);
        assert_eq!(timer.read(ADDR_NAME1), 0x72202020);
        assert_eq!(timer.read(ADDR_VERSION), 0x302e3130);
    }

    #[test]
    fn test_prescaled_count() {
        let mut timer = TimerCore::new();
        timer.write(ADDR_PRESCALER, 4);
        start(&mut timer);
        assert!(timer.is_running());
        assert_eq!(timer.read(ADDR_STATUS), Status::RUNNING::SET.value);
        for _ in 0..19 {
            timer.tick();
        }
        assert_eq!(timer.value(), 5);
    }

    #[test]
    fn test_zero_prescaler_counts_every_cycle() {
        let mut timer = TimerCore::new();
        start(&mut timer);
        for _ in 0..9 {
            timer.tick();
        }
        assert_eq!(timer.read(ADDR_TIMER), 10);
    }

    #[test]
    fn test_stop_freezes_value() {
        let mut timer = TimerCore::new();
        timer.write(ADDR_PRESCALER, 2);
        start(&mut timer);
        for _ in 0..5 {
            timer.tick();
        }
        timer.write(ADDR_CTRL, Control::STOP::SET.value);
        let stopped_at = timer.value();
        for _ in 0..10 {
            timer.tick();
        }
        assert_eq!(timer.value(), stopped_at);
        assert_eq!(timer.read(ADDR_STATUS), 0);
    }

    #[test]
    fn test_stop_wins_over_start() {
        let mut timer = TimerCore::new();
        timer.write(ADDR_CTRL, (Control::START::SET + Control::STOP::SET).value);
        timer.tick();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_timer_is_preloadable() {
        let mut timer = TimerCore::new();
        timer.write(ADDR_TIMER, 0xffff_ffff);
        start(&mut timer);
        assert_eq!(timer.value(), 0);
    }

    #[test]
    fn test_reset() {
        let mut timer = TimerCore::new();
        timer.write(ADDR_PRESCALER, 3);
        start(&mut timer);
        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.read(ADDR_PRESCALER), 0);
        assert_eq!(timer.read(ADDR_CTRL), 0);
        assert!(!timer.status().ready);
        timer.tick();
        assert!(timer.status().ready);
        assert!(!timer.status().valid);
    }
}
