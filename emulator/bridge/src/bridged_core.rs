/*++

Licensed under the Apache-2.0 license.

File Name:

    bridged_core.rs

Abstract:

    File contains the BridgedCore trait, the signal contract a core must
    implement to sit behind the register bridge.

--*/

use ctkey_emu_types::{RegData, RegisterAddress};

use crate::status::CoreStatus;

/// Core-facing side of the bridge.
///
/// This is the software form of the minimal RTL contract: `clk`, `reset_n`,
/// `cs`, `we`, `address[8]` and `write_data[32]` in, `read_data[32]` and
/// `ready` out. The bridge resolves chip select, write enable and reset
/// before calling in, so a core only sees committed transactions.
pub trait BridgedCore {
    /// Short human readable name used in logs.
    fn name(&self) -> &'static str;

    /// Combinational read of the slot at `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Register-file address
    ///
    /// Must not change core state; unmapped and write-only slots return a
    /// fixed value.
    fn read(&self, addr: RegisterAddress) -> RegData;

    /// Commit a write of `val` to `addr` on the current clock edge.
    ///
    /// # Arguments
    ///
    /// * `addr` - Register-file address
    /// * `val` - Data to write
    ///
    /// Writes to read-only or unmapped slots are no-ops.
    fn write(&mut self, addr: RegisterAddress, val: RegData);

    /// Called on every clock edge at which the effective reset is asserted.
    /// Restores control and status state to power-on values.
    fn reset(&mut self);

    /// Called on every clock edge at which the core is out of reset, after
    /// any write for that edge has been applied.
    fn tick(&mut self) {
        // By default, do nothing
    }

    /// Current ready/valid state.
    fn status(&self) -> CoreStatus;
}
