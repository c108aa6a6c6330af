// Licensed under the Apache-2.0 license

use std::fmt;

/// Index of one 32-bit slot in a core's register file.
///
/// The bridge carries the address in an 8-bit control field, so every value
/// of this type names a slot; whether that slot is backed by anything is up
/// to the core's access table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegisterAddress(u8);

impl RegisterAddress {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Position of the slot in a flat register array.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Address `n` slots past this one. Wraps at the end of the 8-bit space
    /// the same way the hardware address field does.
    pub const fn offset(self, n: u8) -> Self {
        Self(self.0.wrapping_add(n))
    }
}

impl From<u8> for RegisterAddress {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<RegisterAddress> for u8 {
    fn from(addr: RegisterAddress) -> Self {
        addr.0
    }
}

impl fmt::Display for RegisterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}
