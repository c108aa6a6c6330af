/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Library interface for the bridged core bring-up emulator.

--*/

pub mod emulator;

pub use emulator::{AesReport, CoreKind, Emulator, EmulatorArgs, WriteEnableArg};
