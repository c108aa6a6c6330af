// Licensed under the Apache-2.0 license

use ctkey_emu_periph::{TimerControl, TimerStatus, STATUS_REG_OFFSET};
use ctkey_emu_types::consts::timer::*;
use ctkey_emu_types::RegData;

use crate::{HwModel, ModelError};

/// Host driver for the timer core. Needs the host status register.
pub struct TimerDriver<'a, M: HwModel> {
    model: &'a mut M,
}

impl<'a, M: HwModel> TimerDriver<'a, M> {
    pub fn new(model: &'a mut M) -> Self {
        Self { model }
    }

    pub fn info(&mut self) -> Result<String, ModelError> {
        self.model.read_identity(ADDR_NAME0)
    }

    /// Wait for the host status register to report the core out of reset.
    pub fn wait_ready(&mut self) -> Result<(), ModelError> {
        self.model
            .poll_until("timer ready", |m| Ok(m.csr_read(STATUS_REG_OFFSET)? & 1 != 0))
    }

    pub fn is_running(&mut self) -> Result<bool, ModelError> {
        Ok(TimerStatus::RUNNING.is_set(self.model.read_word(ADDR_STATUS)?))
    }

    /// Set the prescaler, stopping the timer first if it runs.
    pub fn set_prescaler(&mut self, prescaler: u32) -> Result<(), ModelError> {
        if self.is_running()? {
            self.stop()?;
        }
        self.model.write_word(ADDR_PRESCALER, prescaler)
    }

    /// Start counting and wait until the core reports it is running.
    pub fn start(&mut self) -> Result<(), ModelError> {
        self.model.write_word(ADDR_CTRL, TimerControl::START::SET.value)?;
        self.model.poll_until("timer running", |m| {
            Ok(TimerStatus::RUNNING.is_set(m.read_word(ADDR_STATUS)?))
        })
    }

    pub fn stop(&mut self) -> Result<(), ModelError> {
        self.model.write_word(ADDR_CTRL, TimerControl::STOP::SET.value)
    }

    pub fn read(&mut self) -> Result<RegData, ModelError> {
        self.model.read_word(ADDR_TIMER)
    }

    pub fn write(&mut self, value: RegData) -> Result<(), ModelError> {
        self.model.write_word(ADDR_TIMER, value)
    }
}
