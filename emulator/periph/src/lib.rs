/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the bridged core peripheral library.

--*/

mod aes_core;
mod csr_bridge;
mod timer_core;

pub use aes_core::{AesConfig, AesCore, AesTiming, Control as AesControl, Direction, KeyLength};
pub use csr_bridge::{
    CsrBridge, CTRL_REG_OFFSET, READ_REG_OFFSET, STATUS_REG_OFFSET, WRITE_REG_OFFSET,
};
pub use timer_core::{Control as TimerControl, Status as TimerStatus, TimerCore};
