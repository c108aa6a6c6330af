/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the common types shared by the register bridge and the
    cores wired behind it.

--*/

mod addr;
pub mod consts;

pub use addr::RegisterAddress;

/// Width of every register-file slot and of the bridge data registers.
pub type RegData = u32;

/// Number of slots addressable through the 8-bit bridge address field.
pub const REGISTER_FILE_SIZE: usize = 256;
