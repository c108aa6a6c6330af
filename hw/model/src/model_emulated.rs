// Licensed under the Apache-2.0 license

use crate::HwModel;
use crate::InitParams;
use crate::ModelError;
use caliptra_emu_bus::Bus;
use caliptra_emu_bus::Clock;
use caliptra_emu_types::RvAddr;
use caliptra_emu_types::RvData;
use caliptra_emu_types::RvSize;
use ctkey_emu_bridge::{Bridge, BridgedCore};
use ctkey_emu_periph::CsrBridge;

/// Emulated model
pub struct ModelEmulated<C: BridgedCore> {
    clock: Clock,
    csr: CsrBridge<C>,
    poll_limit: u64,
}

impl<C: BridgedCore> ModelEmulated<C> {
    pub fn new(core: C, params: InitParams) -> Self {
        let clock = Clock::new();
        let mut csr = CsrBridge::new(core, params.bridge, &clock);
        if params.status_register {
            csr = csr.with_status_register();
        }
        Self {
            clock,
            csr,
            poll_limit: params.poll_limit,
        }
    }

    pub fn bridge(&self) -> &Bridge<C> {
        self.csr.bridge()
    }

    pub fn core(&self) -> &C {
        self.csr.bridge().core()
    }

    pub fn csr(&mut self) -> &mut CsrBridge<C> {
        &mut self.csr
    }

    /// Pulse the system reset input for one edge.
    pub fn system_reset(&mut self) {
        self.csr.warm_reset();
        self.step();
    }
}

impl<C: BridgedCore> HwModel for ModelEmulated<C> {
    fn type_name(&self) -> &'static str {
        "ModelEmulated"
    }

    fn step(&mut self) {
        self.clock.increment_and_process_timer_actions(1, &mut self.csr);
    }

    fn cycle_count(&self) -> u64 {
        self.clock.now()
    }

    fn poll_limit(&self) -> u64 {
        self.poll_limit
    }

    fn csr_read(&mut self, offset: RvAddr) -> Result<RvData, ModelError> {
        self.csr
            .read(RvSize::Word, offset)
            .map_err(|cause| ModelError::Bus { offset, cause })
    }

    fn csr_write(&mut self, offset: RvAddr, val: RvData) -> Result<(), ModelError> {
        self.csr
            .write(RvSize::Word, offset, val)
            .map_err(|cause| ModelError::Bus { offset, cause })?;
        self.step();
        Ok(())
    }
}
