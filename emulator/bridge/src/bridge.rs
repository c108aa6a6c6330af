/*++

Licensed under the Apache-2.0 license.

File Name:

    bridge.rs

Abstract:

    File contains the register bridge: three host-facing registers in front
    of a core's register file, and the per-edge dispatcher between them.

--*/

use std::cell::Cell;

use ctkey_emu_types::{RegData, RegisterAddress};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::InMemoryRegister;

use crate::bridged_core::BridgedCore;
use crate::config::{BridgeConfig, WriteEnablePolicy};
use crate::control::{decode, Control, CONTROL_RESET_VALUE};
use crate::status::CoreStatus;

/// What a single clock edge did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transaction {
    /// Effective reset was asserted; CS and WE were ignored.
    Reset,

    /// `data` was committed to `address`.
    Write {
        address: RegisterAddress,
        data: RegData,
    },

    /// Selected without write enable; the read register follows `address`.
    Read { address: RegisterAddress },

    /// Chip select deasserted.
    Idle,
}

/// Register-mapped bridge in front of a [`BridgedCore`].
///
/// The host sees a write register, a read register and a packed control
/// register. Every call to [`Bridge::tick`] is one clock edge: exactly one
/// register-file slot is written when CS and WE both hold, nothing happens
/// otherwise. Reads are level sensitive and never need an edge.
pub struct Bridge<C: BridgedCore> {
    config: BridgeConfig,
    core: C,
    control: InMemoryRegister<u32, Control::Register>,
    write_data: RegData,
    read_data: Cell<RegData>,
    external_reset: bool,
    cycles: u64,
}

impl<C: BridgedCore> Bridge<C> {
    pub fn new(core: C, config: BridgeConfig) -> Self {
        Self {
            config,
            core,
            control: InMemoryRegister::new(CONTROL_RESET_VALUE),
            write_data: 0,
            read_data: Cell::new(0),
            external_reset: false,
            cycles: 0,
        }
    }

    pub fn config(&self) -> BridgeConfig {
        self.config
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// Current value of the packed control register.
    pub fn control(&self) -> u32 {
        self.control.get()
    }

    /// Replace the control word. The read register keeps the projection
    /// of the outgoing word.
    pub fn set_control(&mut self, val: u32) {
        self.project();
        self.control.set(val);
    }

    /// Pending write data.
    pub fn write_register(&self) -> RegData {
        self.write_data
    }

    pub fn set_write_register(&mut self, val: RegData) {
        self.write_data = val;
    }

    /// Value of the read register.
    ///
    /// While CS holds and WE does not, this is the core's slot at the
    /// current address; otherwise it is whatever was last projected.
    pub fn read_register(&self) -> RegData {
        self.project();
        self.read_data.get()
    }

    fn project(&self) {
        let decoded = decode(self.control.get());
        if decoded.is_read() {
            self.read_data.set(self.core.read(decoded.address));
        }
    }

    /// Drive the system reset input. It stays at the given level until it
    /// is changed again.
    pub fn set_external_reset(&mut self, asserted: bool) {
        self.external_reset = asserted;
    }

    pub fn external_reset(&self) -> bool {
        self.external_reset
    }

    /// Whether the next edge will be a reset edge.
    pub fn in_reset(&self) -> bool {
        decode(self.control.get()).effective_reset(self.external_reset)
    }

    /// Ready/valid as driven by the core.
    pub fn status(&self) -> CoreStatus {
        self.core.status()
    }

    /// Number of edges seen since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advance one clock edge.
    pub fn tick(&mut self) -> Transaction {
        self.cycles += 1;
        let decoded = decode(self.control.get());

        if decoded.effective_reset(self.external_reset) {
            self.core.reset();
            log::trace!("{}: cycle {} reset", self.core.name(), self.cycles);
            return Transaction::Reset;
        }

        let transaction = if decoded.is_write() {
            self.core.write(decoded.address, self.write_data);
            if self.config.write_enable == WriteEnablePolicy::Pulse {
                self.control.modify(Control::WE::CLEAR);
            }
            Transaction::Write {
                address: decoded.address,
                data: self.write_data,
            }
        } else if decoded.chip_select {
            Transaction::Read {
                address: decoded.address,
            }
        } else {
            Transaction::Idle
        };
        self.core.tick();
        self.project();

        log::trace!("{}: cycle {} {:?}", self.core.name(), self.cycles, transaction);
        transaction
    }
}
