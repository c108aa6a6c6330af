/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the register-mapped bridge library.

--*/

mod bridge;
mod bridged_core;
mod config;
pub mod control;
mod register_file;
pub mod status;

pub use bridge::{Bridge, Transaction};
pub use bridged_core::BridgedCore;
pub use config::{BridgeConfig, WriteEnablePolicy};
pub use control::{decode, Control, DecodedControl, CONTROL_RESET_VALUE};
pub use register_file::{Access, RegisterFile, RegisterMap, UNMAPPED_READ_VALUE};
pub use status::CoreStatus;
