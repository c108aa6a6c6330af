// Licensed under the Apache-2.0 license

use caliptra_emu_bus::BusError;
use caliptra_emu_types::{RvAddr, RvData};
use ctkey_emu_bridge::{BridgeConfig, Control};
use ctkey_emu_periph::{CTRL_REG_OFFSET, READ_REG_OFFSET, WRITE_REG_OFFSET};
use ctkey_emu_types::{RegData, RegisterAddress};
use thiserror::Error;

pub use aes::{AesDriver, AesState};
pub use model_emulated::ModelEmulated;
pub use timer::TimerDriver;

mod aes;
mod model_emulated;
mod timer;
pub mod vectors;

/// Cycles a poll loop may spend before giving up.
pub const DEFAULT_POLL_LIMIT: u64 = 10_000;

/// Errors raised by host-side accesses to a bridged core.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    #[error("CSR access at offset 0x{offset:02x} faulted ({cause:?})")]
    Bus { offset: RvAddr, cause: BusError },
    #[error("gave up waiting for {what} after {cycles} cycles")]
    Timeout { what: &'static str, cycles: u64 },
    #[error("status 0x{status:x} does not allow {expected}")]
    UnexpectedStatus { status: u32, expected: &'static str },
}

#[derive(Clone, Copy, Debug)]
pub struct InitParams {
    pub bridge: BridgeConfig,

    /// Expose the ready bit at the host status register
    pub status_register: bool,

    /// Upper bound, in cycles, for every poll loop
    pub poll_limit: u64,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::default(),
            status_register: false,
            poll_limit: DEFAULT_POLL_LIMIT,
        }
    }
}

/// Host view of a bridged core: three CSRs and a clock.
///
/// The required methods are the raw CSR block; the provided ones are the
/// access sequences host software runs over it.
pub trait HwModel {
    /// The type name of this model
    fn type_name(&self) -> &'static str;

    /// Step execution ahead one clock cycle.
    fn step(&mut self);

    fn cycle_count(&self) -> u64;

    fn poll_limit(&self) -> u64;

    /// Read a host CSR.
    fn csr_read(&mut self, offset: RvAddr) -> Result<RvData, ModelError>;

    /// Write a host CSR. The write is followed by one clock cycle.
    fn csr_write(&mut self, offset: RvAddr, val: RvData) -> Result<(), ModelError>;

    fn step_n(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// Execute until the result of `predicate` becomes true.
    fn step_until(&mut self, mut predicate: impl FnMut(&mut Self) -> bool) {
        while !predicate(self) {
            self.step();
        }
    }

    /// Read one register-file word: select, sample the read register,
    /// deselect.
    fn read_word(&mut self, addr: RegisterAddress) -> Result<RegData, ModelError> {
        let addr_field = Control::RST::SET + Control::ADDR.val(addr.value().into());
        self.csr_write(CTRL_REG_OFFSET, (addr_field + Control::CS::SET).value)?;
        let data = self.csr_read(READ_REG_OFFSET)?;
        self.csr_write(CTRL_REG_OFFSET, addr_field.value)?;
        Ok(data)
    }

    /// Write one register-file word: load the write register, select with
    /// write enable, deselect.
    fn write_word(&mut self, addr: RegisterAddress, data: RegData) -> Result<(), ModelError> {
        log::trace!("{}: write {data:08x} to {addr}", self.type_name());
        let addr_field = Control::RST::SET + Control::ADDR.val(addr.value().into());
        self.csr_write(WRITE_REG_OFFSET, data)?;
        self.csr_write(
            CTRL_REG_OFFSET,
            (addr_field + Control::CS::SET + Control::WE::SET).value,
        )?;
        self.csr_write(CTRL_REG_OFFSET, addr_field.value)
    }

    /// Hold the core in reset for one edge through the control register,
    /// then release it.
    fn reset_core(&mut self) -> Result<(), ModelError> {
        self.csr_write(CTRL_REG_OFFSET, Control::RST::CLEAR.value)?;
        self.csr_write(CTRL_REG_OFFSET, Control::RST::SET.value)
    }

    /// Read three identity words and render them as text.
    fn read_identity(&mut self, base: RegisterAddress) -> Result<String, ModelError> {
        let mut bytes = Vec::with_capacity(12);
        for i in 0..3 {
            bytes.extend_from_slice(&self.read_word(base.offset(i))?.to_be_bytes());
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Run `predicate` until it holds, stepping one cycle between tries.
    /// Fails once more than the poll limit of cycles has elapsed.
    fn poll_until(
        &mut self,
        what: &'static str,
        mut predicate: impl FnMut(&mut Self) -> Result<bool, ModelError>,
    ) -> Result<(), ModelError> {
        let start = self.cycle_count();
        loop {
            if predicate(self)? {
                return Ok(());
            }
            let cycles = self.cycle_count() - start;
            if cycles >= self.poll_limit() {
                return Err(ModelError::Timeout { what, cycles });
            }
            self.step();
        }
    }
}
