// Licensed under the Apache-2.0 license

//! Control Decode Unit
//!
//! The host drives the bridge through a single packed control word. Fields
//! are laid out in CSR declaration order, least significant bit first:
//!
//! | Bits  | Field  | Meaning                                   |
//! |-------|--------|-------------------------------------------|
//! | 0     | `WE`   | write enable                              |
//! | 1     | `CS`   | chip select, gates every transaction      |
//! | 2     | `RST`  | core reset, active-low level (`reset_n`)  |
//! | 3..10 | `ADDR` | register-file address                     |
//!
//! `RST` is the only reset polarity supported. It powers up at 1, so the
//! core runs as soon as the system reset is released, and the core is held
//! in reset for every clock edge at which the field reads 0. The system
//! reset is OR-ed in on top:
//!
//! ```text
//! EffectiveReset = ExternalReset | !RST
//! ```
//!
//! Decoding is a pure function of the current word; nothing here is latched.

use ctkey_emu_types::RegisterAddress;
use tock_registers::interfaces::Readable;
use tock_registers::register_bitfields;
use tock_registers::registers::InMemoryRegister;

register_bitfields! [
    u32,

    /// Packed bridge control word
    pub Control [
        WE OFFSET(0) NUMBITS(1) [],
        CS OFFSET(1) NUMBITS(1) [],
        RST OFFSET(2) NUMBITS(1) [],
        ADDR OFFSET(3) NUMBITS(8) [],
    ],
];

/// Power-on value of the control register: deselected, no write pending,
/// reset released.
pub const CONTROL_RESET_VALUE: u32 = 1 << 2;

/// Control word split into the signals the core sees for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedControl {
    pub write_enable: bool,
    pub chip_select: bool,
    /// Raw `RST` field. Low means "hold the core in reset".
    pub reset_n: bool,
    pub address: RegisterAddress,
}

impl DecodedControl {
    /// Reset seen by the core this cycle.
    pub fn effective_reset(&self, external_reset: bool) -> bool {
        external_reset || !self.reset_n
    }

    /// A write is committed on an edge where both CS and WE hold.
    pub fn is_write(&self) -> bool {
        self.chip_select && self.write_enable
    }

    /// The read register follows the addressed slot while selected and not
    /// writing.
    pub fn is_read(&self) -> bool {
        self.chip_select && !self.write_enable
    }
}

/// Unpack a control word.
pub fn decode(word: u32) -> DecodedControl {
    let reg = InMemoryRegister::<u32, Control::Register>::new(word);
    DecodedControl {
        write_enable: reg.is_set(Control::WE),
        chip_select: reg.is_set(Control::CS),
        reset_n: reg.is_set(Control::RST),
        address: RegisterAddress::new(reg.read(Control::ADDR) as u8),
    }
}
