// Licensed under the Apache-2.0 license

//! Ready/valid projection of a core's progress state.
//!
//! The bridge never looks at these bits. Host software polls them before
//! issuing commands or reading results.

use tock_registers::interfaces::Readable;
use tock_registers::register_bitfields;
use tock_registers::registers::InMemoryRegister;

register_bitfields! [
    u32,

    /// Status word surfaced at a core's status address
    pub Status [
        READY OFFSET(0) NUMBITS(1) [],
        VALID OFFSET(1) NUMBITS(1) [],
    ],
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreStatus {
    /// The core can accept a new command.
    pub ready: bool,
    /// The result registers hold a completed computation.
    pub valid: bool,
}

impl CoreStatus {
    pub fn word(self) -> u32 {
        (Status::READY.val(self.ready as u32) + Status::VALID.val(self.valid as u32)).value
    }

    pub fn from_word(word: u32) -> Self {
        let reg = InMemoryRegister::<u32, Status::Register>::new(word);
        Self {
            ready: reg.is_set(Status::READY),
            valid: reg.is_set(Status::VALID),
        }
    }
}
