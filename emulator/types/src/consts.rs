/*++

Licensed under the Apache-2.0 license.

File Name:

    consts.rs

Abstract:

    File contains the register-file address maps of the bridged cores.

--*/

/// Register map of the AES core.
pub mod aes {
    use crate::{RegData, RegisterAddress};

    /// First part of the core name
    pub const ADDR_NAME0: RegisterAddress = RegisterAddress::new(0x00);
    /// Second part of the core name
    pub const ADDR_NAME1: RegisterAddress = RegisterAddress::new(0x01);
    /// Core version
    pub const ADDR_VERSION: RegisterAddress = RegisterAddress::new(0x02);

    /// Control register (init/next commands)
    pub const ADDR_CTRL: RegisterAddress = RegisterAddress::new(0x08);

    /// Status register
    pub const ADDR_STATUS: RegisterAddress = RegisterAddress::new(0x09);

    /// Configuration register
    pub const ADDR_CONFIG: RegisterAddress = RegisterAddress::new(0x0a);

    pub const ADDR_KEY0: RegisterAddress = RegisterAddress::new(0x10);
    pub const ADDR_KEY7: RegisterAddress = RegisterAddress::new(0x17);
    pub const KEY_WORDS: usize = 8;

    pub const ADDR_BLOCK0: RegisterAddress = RegisterAddress::new(0x20);
    pub const ADDR_BLOCK3: RegisterAddress = RegisterAddress::new(0x23);
    pub const BLOCK_WORDS: usize = 4;

    pub const ADDR_RESULT0: RegisterAddress = RegisterAddress::new(0x30);
    pub const ADDR_RESULT3: RegisterAddress = RegisterAddress::new(0x33);
    pub const RESULT_WORDS: usize = 4;

    /// "aes "
    pub const CORE_NAME0: RegData = 0x6165_7320;
    /// "    "
    pub const CORE_NAME1: RegData = 0x2020_2020;
    /// "0.60"
    pub const CORE_VERSION: RegData = 0x302e_3630;
}

/// Register map of the timer core.
pub mod timer {
    use crate::{RegData, RegisterAddress};

    pub const ADDR_NAME0: RegisterAddress = RegisterAddress::new(0x00);
    pub const ADDR_NAME1: RegisterAddress = RegisterAddress::new(0x01);
    pub const ADDR_VERSION: RegisterAddress = RegisterAddress::new(0x02);

    pub const ADDR_CTRL: RegisterAddress = RegisterAddress::new(0x08);
    pub const ADDR_STATUS: RegisterAddress = RegisterAddress::new(0x09);

    pub const ADDR_PRESCALER: RegisterAddress = RegisterAddress::new(0x0a);
    pub const ADDR_TIMER: RegisterAddress = RegisterAddress::new(0x0b);

    /// "time"
    pub const CORE_NAME0: RegData = 0x7469_6d65;
    /// "r   "
    pub const CORE_NAME1: RegData = 0x7220_2020;
    /// "0.10"
    pub const CORE_VERSION: RegData = 0x302e_3130;
}
