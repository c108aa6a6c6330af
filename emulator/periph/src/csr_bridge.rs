/*++

Licensed under the Apache-2.0 license.

File Name:

    csr_bridge.rs

Abstract:

    File contains the host-facing CSR block that drives a register bridge.

--*/

use caliptra_emu_bus::{Bus, BusError, Clock, Timer};
use caliptra_emu_types::{RvAddr, RvData, RvSize};
use ctkey_emu_bridge::{Bridge, BridgeConfig, BridgedCore};
use tock_registers::register_bitfields;

/// Write Register
pub const WRITE_REG_OFFSET: RvAddr = 0x00;

/// Read Register
pub const READ_REG_OFFSET: RvAddr = 0x04;

/// Control Register
pub const CTRL_REG_OFFSET: RvAddr = 0x08;

/// Status Register, only present when enabled
pub const STATUS_REG_OFFSET: RvAddr = 0x0c;

register_bitfields! [
    u32,

    /// Host status register fields
    pub HostStatus [
        READY OFFSET(0) NUMBITS(1) [],
    ],
];

/// Host CSR block in front of a [`Bridge`].
///
/// The bridge is clocked once per emulator tick through `poll`. A warm
/// reset asserts the external reset for the following edge.
pub struct CsrBridge<C: BridgedCore> {
    bridge: Bridge<C>,
    status_register: bool,
    system_reset: bool,
    timer: Timer,
}

impl<C: BridgedCore> CsrBridge<C> {
    pub fn new(core: C, config: BridgeConfig, clock: &Clock) -> Self {
        let timer = Timer::new(clock);
        timer.schedule_poll_in(1);
        Self {
            bridge: Bridge::new(core, config),
            status_register: false,
            system_reset: false,
            timer,
        }
    }

    /// Expose the core's ready bit at [`STATUS_REG_OFFSET`].
    pub fn with_status_register(mut self) -> Self {
        self.status_register = true;
        self
    }

    pub fn has_status_register(&self) -> bool {
        self.status_register
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        if self.status_register {
            STATUS_REG_OFFSET + 4
        } else {
            STATUS_REG_OFFSET
        }
    }

    pub fn bridge(&self) -> &Bridge<C> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut Bridge<C> {
        &mut self.bridge
    }
}

impl<C: BridgedCore> Bus for CsrBridge<C> {
    /// Read data of specified size from given address
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the read
    /// * `addr` - Address to read from
    ///
    /// # Error
    ///
    /// * `BusError::LoadAccessFault` - Non-word access or unknown offset
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if size != RvSize::Word {
            Err(BusError::LoadAccessFault)?
        }
        match addr {
            WRITE_REG_OFFSET => Ok(self.bridge.write_register()),
            READ_REG_OFFSET => Ok(self.bridge.read_register()),
            CTRL_REG_OFFSET => Ok(self.bridge.control()),
            STATUS_REG_OFFSET if self.status_register => {
                Ok(HostStatus::READY.val(self.bridge.status().ready as u32).value)
            }
            _ => Err(BusError::LoadAccessFault),
        }
    }

    /// Write data of specified size to given address
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the write
    /// * `addr` - Address to write
    /// * `val` - Data to write
    ///
    /// # Error
    ///
    /// * `BusError::StoreAccessFault` - Non-word access or unknown offset
    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if size != RvSize::Word {
            Err(BusError::StoreAccessFault)?
        }
        match addr {
            WRITE_REG_OFFSET => self.bridge.set_write_register(val),
            CTRL_REG_OFFSET => self.bridge.set_control(val),
            // Status CSRs, host writes are dropped
            READ_REG_OFFSET => {}
            STATUS_REG_OFFSET if self.status_register => {}
            _ => Err(BusError::StoreAccessFault)?,
        }
        Ok(())
    }

    fn poll(&mut self) {
        self.bridge.set_external_reset(self.system_reset);
        self.system_reset = false;
        self.bridge.tick();
        self.timer.schedule_poll_in(1);
    }

    fn warm_reset(&mut self) {
        log::info!("{}: system reset", self.bridge.core().name());
        self.system_reset = true;
    }
}
