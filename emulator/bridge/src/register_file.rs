/*++

Licensed under the Apache-2.0 license.

File Name:

    register_file.rs

Abstract:

    File contains the flat register file a bridged core exposes, together
    with the access-class table that is checked on every host access.

--*/

use std::ops::RangeInclusive;

use ctkey_emu_types::{RegData, RegisterAddress, REGISTER_FILE_SIZE};

/// Value returned for reads the access table does not allow.
pub const UNMAPPED_READ_VALUE: RegData = 0;

/// Access class of one register-file slot, as seen from the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Access {
    /// Not backed by anything
    #[default]
    Unmapped,

    /// Host reads return the slot; host writes are dropped
    ReadOnly,

    /// Host writes land in the slot; host reads return the sentinel
    WriteOnly,

    ReadWrite,
}

impl Access {
    pub fn is_readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }
}

/// Access-class table for a whole register file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterMap {
    access: [Access; REGISTER_FILE_SIZE],
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterMap {
    /// Table with every slot unmapped.
    pub fn new() -> Self {
        Self {
            access: [Access::Unmapped; REGISTER_FILE_SIZE],
        }
    }

    /// Assign `access` to every slot in `range`. Later regions override
    /// earlier ones.
    ///
    /// # Panics
    ///
    /// If `range` ends before it starts.
    pub fn with_region(mut self, range: RangeInclusive<RegisterAddress>, access: Access) -> Self {
        let (start, end) = range.into_inner();
        assert!(start <= end, "register region {start}..={end} is reversed");
        for slot in &mut self.access[start.index()..=end.index()] {
            *slot = access;
        }
        self
    }

    /// Assign `access` to a single slot.
    pub fn with_register(self, addr: RegisterAddress, access: Access) -> Self {
        self.with_region(addr..=addr, access)
    }

    pub fn access(&self, addr: RegisterAddress) -> Access {
        self.access[addr.index()]
    }
}

/// Flat array of 32-bit registers indexed by [`RegisterAddress`].
///
/// Host accesses (`read`/`write`) go through the access table and never
/// fail: a disallowed write is dropped and a disallowed read returns
/// [`UNMAPPED_READ_VALUE`]. The core itself uses `load`/`store`, which
/// bypass the table the way internal hardware paths bypass the bus decode.
pub struct RegisterFile {
    map: RegisterMap,
    words: [RegData; REGISTER_FILE_SIZE],
}

impl RegisterFile {
    pub fn new(map: RegisterMap) -> Self {
        Self {
            map,
            words: [0; REGISTER_FILE_SIZE],
        }
    }

    pub fn map(&self) -> &RegisterMap {
        &self.map
    }

    /// Host read of `addr`.
    pub fn read(&self, addr: RegisterAddress) -> RegData {
        let access = self.map.access(addr);
        if access.is_readable() {
            self.words[addr.index()]
        } else {
            log::trace!("register file: read of {access:?} slot {addr} returns sentinel");
            UNMAPPED_READ_VALUE
        }
    }

    /// Host write of `val` to `addr`. Returns `true` when the slot was
    /// updated and `false` when the access table absorbed the write.
    pub fn write(&mut self, addr: RegisterAddress, val: RegData) -> bool {
        let access = self.map.access(addr);
        if access.is_writable() {
            self.words[addr.index()] = val;
            true
        } else {
            log::trace!("register file: write of 0x{val:08x} to {access:?} slot {addr} dropped");
            false
        }
    }

    /// Core-side read, ignoring the access table.
    pub fn load(&self, addr: RegisterAddress) -> RegData {
        self.words[addr.index()]
    }

    /// Core-side write, ignoring the access table.
    pub fn store(&mut self, addr: RegisterAddress, val: RegData) {
        self.words[addr.index()] = val;
    }

    /// Load `out.len()` consecutive words starting at `base`.
    pub fn load_words(&self, base: RegisterAddress, out: &mut [RegData]) {
        for (i, word) in out.iter_mut().enumerate() {
            *word = self.load(base.offset(i as u8));
        }
    }

    /// Store consecutive words starting at `base`.
    pub fn store_words(&mut self, base: RegisterAddress, words: &[RegData]) {
        for (i, word) in words.iter().enumerate() {
            self.store(base.offset(i as u8), *word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENT: RegisterAddress = RegisterAddress::new(0x00);
    const SCRATCH: RegisterAddress = RegisterAddress::new(0x04);
    const DOORBELL: RegisterAddress = RegisterAddress::new(0x05);
    const RESULT: RegisterAddress = RegisterAddress::new(0x30);

    fn test_file() -> RegisterFile {
        let map = RegisterMap::new()
            .with_register(IDENT, Access::ReadOnly)
            .with_register(SCRATCH, Access::ReadWrite)
            .with_register(DOORBELL, Access::WriteOnly)
            .with_region(RESULT..=RESULT.offset(3), Access::ReadOnly);
        let mut regs = RegisterFile::new(map);
        regs.store(IDENT, 0x6964_656e);
        regs
    }

    #[test]
    fn test_access_classes() {
        assert!(Access::ReadWrite.is_readable() && Access::ReadWrite.is_writable());
        assert!(Access::ReadOnly.is_readable() && !Access::ReadOnly.is_writable());
        assert!(!Access::WriteOnly.is_readable() && Access::WriteOnly.is_writable());
        assert!(!Access::Unmapped.is_readable() && !Access::Unmapped.is_writable());
    }

    #[test]
    fn test_region_overrides() {
        let map = RegisterMap::new()
            .with_region(RegisterAddress::new(0x10)..=RegisterAddress::new(0x17), Access::ReadWrite)
            .with_register(RegisterAddress::new(0x12), Access::ReadOnly);
        assert_eq!(map.access(RegisterAddress::new(0x10)), Access::ReadWrite);
        assert_eq!(map.access(RegisterAddress::new(0x12)), Access::ReadOnly);
        assert_eq!(map.access(RegisterAddress::new(0x17)), Access::ReadWrite);
        assert_eq!(map.access(RegisterAddress::new(0x18)), Access::Unmapped);
    }

    #[test]
    fn test_read_write_round_trip() {
        let mut regs = test_file();
        for val in [0, 1, 0xdead_beef, u32::MAX] {
            assert!(regs.write(SCRATCH, val));
            assert_eq!(regs.read(SCRATCH), val);
        }
    }

    #[test]
    fn test_read_only_write_is_dropped() {
        let mut regs = test_file();
        assert!(!regs.write(IDENT, 0x1234_5678));
        assert_eq!(regs.read(IDENT), 0x6964_656e);
        assert!(!regs.write(RESULT.offset(2), 0x1234_5678));
        assert_eq!(regs.read(RESULT.offset(2)), 0);
    }

    #[test]
    fn test_write_only_reads_sentinel() {
        let mut regs = test_file();
        assert!(regs.write(DOORBELL, 0xcafe_f00d));
        assert_eq!(regs.read(DOORBELL), UNMAPPED_READ_VALUE);
        assert_eq!(regs.load(DOORBELL), 0xcafe_f00d);
    }

    #[test]
    fn test_unmapped_slots() {
        let mut regs = test_file();
        for addr in [0x01, 0x0b, 0x40, 0xff].map(RegisterAddress::new) {
            assert!(!regs.write(addr, 0xffff_ffff));
            assert_eq!(regs.read(addr), UNMAPPED_READ_VALUE);
            assert_eq!(regs.load(addr), 0);
        }
    }

    #[test]
    fn test_block_helpers() {
        let mut regs = test_file();
        regs.store_words(RESULT, &[1, 2, 3, 4]);
        let mut out = [0; 4];
        regs.load_words(RESULT, &mut out);
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(regs.read(RESULT.offset(3)), 4);
    }

    #[test]
    #[should_panic(expected = "register region 0x17..=0x10 is reversed")]
    fn test_reversed_region_panics() {
        let _ = RegisterMap::new().with_region(
            RegisterAddress::new(0x17)..=RegisterAddress::new(0x10),
            Access::ReadWrite,
        );
    }
}
