/*++

Licensed under the Apache-2.0 license.

File Name:

    aes_core.rs

Abstract:

    File contains the AES core model that sits behind the register bridge.

--*/

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes256};
use ctkey_emu_bridge::{Access, BridgedCore, CoreStatus, RegisterFile, RegisterMap};
use ctkey_emu_types::consts::aes::*;
use ctkey_emu_types::{RegData, RegisterAddress};
use tock_registers::interfaces::Readable;
use tock_registers::register_bitfields;
use tock_registers::registers::InMemoryRegister;

register_bitfields! [
    u32,

    /// Control Register Fields
    pub Control [
        INIT OFFSET(0) NUMBITS(1) [],
        NEXT OFFSET(1) NUMBITS(1) [],
    ],

    /// Config Register Fields
    pub Config [
        ENCDEC OFFSET(0) NUMBITS(1) [
            DECIPHER = 0,
            ENCIPHER = 1,
        ],
        KEYLEN OFFSET(1) NUMBITS(1) [
            AES_128 = 0,
            AES_256 = 1,
        ],
    ],
];

/// The number of clock cycles it takes to expand a key.
const KEY_EXPANSION_CYCLES: u64 = 15;

/// The number of clock cycles it takes to process one block.
const BLOCK_CYCLES: u64 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Decipher,
    Encipher,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyLength {
    Aes128,
    Aes256,
}

impl KeyLength {
    /// Number of key registers consumed by key expansion.
    pub fn words(self) -> usize {
        match self {
            KeyLength::Aes128 => 4,
            KeyLength::Aes256 => KEY_WORDS,
        }
    }
}

/// Decoded contents of the config register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AesConfig {
    pub direction: Direction,
    pub key_length: KeyLength,
}

impl AesConfig {
    pub fn new(direction: Direction, key_length: KeyLength) -> Self {
        Self {
            direction,
            key_length,
        }
    }

    pub fn word(self) -> RegData {
        let encdec = match self.direction {
            Direction::Decipher => Config::ENCDEC::DECIPHER,
            Direction::Encipher => Config::ENCDEC::ENCIPHER,
        };
        let keylen = match self.key_length {
            KeyLength::Aes128 => Config::KEYLEN::AES_128,
            KeyLength::Aes256 => Config::KEYLEN::AES_256,
        };
        (encdec + keylen).value
    }

    pub fn from_word(word: RegData) -> Self {
        let reg = InMemoryRegister::<u32, Config::Register>::new(word);
        Self {
            direction: if reg.is_set(Config::ENCDEC) {
                Direction::Encipher
            } else {
                Direction::Decipher
            },
            key_length: if reg.is_set(Config::KEYLEN) {
                KeyLength::Aes256
            } else {
                KeyLength::Aes128
            },
        }
    }
}

/// Latency of the core operations, in bridge clock cycles.
///
/// An operation commanded on edge `n` completes on edge `n + cycles - 1`;
/// zero behaves like one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AesTiming {
    pub init_cycles: u64,
    pub next_cycles: u64,
}

impl Default for AesTiming {
    fn default() -> Self {
        Self {
            init_cycles: KEY_EXPANSION_CYCLES,
            next_cycles: BLOCK_CYCLES,
        }
    }
}

/// Round keys produced by an `init` command.
#[derive(Clone)]
enum KeySchedule {
    Aes128(Aes128),
    Aes256(Aes256),
}

impl KeySchedule {
    fn expand(key: &[RegData; KEY_WORDS], key_length: KeyLength) -> Self {
        let mut bytes = [0u8; KEY_WORDS * 4];
        words_to_bytes(key, &mut bytes);
        match key_length {
            KeyLength::Aes128 => Self::Aes128(Aes128::new(GenericArray::from_slice(&bytes[..16]))),
            KeyLength::Aes256 => Self::Aes256(Aes256::new(GenericArray::from_slice(&bytes))),
        }
    }

    fn process(
        &self,
        direction: Direction,
        block: &[RegData; BLOCK_WORDS],
    ) -> [RegData; RESULT_WORDS] {
        let mut bytes = [0u8; BLOCK_WORDS * 4];
        words_to_bytes(block, &mut bytes);
        let data = GenericArray::from_mut_slice(&mut bytes);
        match (self, direction) {
            (Self::Aes128(cipher), Direction::Encipher) => cipher.encrypt_block(data),
            (Self::Aes128(cipher), Direction::Decipher) => cipher.decrypt_block(data),
            (Self::Aes256(cipher), Direction::Encipher) => cipher.encrypt_block(data),
            (Self::Aes256(cipher), Direction::Decipher) => cipher.decrypt_block(data),
        }
        let mut result = [0; RESULT_WORDS];
        for (word, chunk) in result.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        result
    }
}

fn words_to_bytes(words: &[RegData], out: &mut [u8]) {
    for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
}

enum Operation {
    KeyExpansion(KeySchedule),
    Block([RegData; RESULT_WORDS]),
}

struct InFlight {
    op: Operation,
    remaining: u64,
}

/// AES block cipher core.
///
/// Software loads the key words and config, pulses `init`, waits for
/// `ready`, loads a block, pulses `next` and polls for `valid` before
/// reading the result words.
pub struct AesCore {
    regs: RegisterFile,
    timing: AesTiming,
    key_schedule: Option<KeySchedule>,
    in_flight: Option<InFlight>,
    valid: bool,
    in_reset: bool,
}

impl Default for AesCore {
    fn default() -> Self {
        Self::new(AesTiming::default())
    }
}

impl AesCore {
    pub fn new(timing: AesTiming) -> Self {
        let map = RegisterMap::new()
            .with_region(ADDR_NAME0..=ADDR_VERSION, Access::ReadOnly)
            .with_register(ADDR_CTRL, Access::ReadWrite)
            .with_register(ADDR_STATUS, Access::ReadOnly)
            .with_register(ADDR_CONFIG, Access::ReadWrite)
            .with_region(ADDR_KEY0..=ADDR_KEY7, Access::ReadWrite)
            .with_region(ADDR_BLOCK0..=ADDR_BLOCK3, Access::ReadWrite)
            .with_region(ADDR_RESULT0..=ADDR_RESULT3, Access::ReadOnly);
        let mut regs = RegisterFile::new(map);
        regs.store_words(ADDR_NAME0, &[CORE_NAME0, CORE_NAME1, CORE_VERSION]);
        Self {
            regs,
            timing,
            key_schedule: None,
            in_flight: None,
            valid: false,
            in_reset: false,
        }
    }

    pub fn timing(&self) -> AesTiming {
        self.timing
    }

    /// Current contents of the config register.
    pub fn config(&self) -> AesConfig {
        AesConfig::from_word(self.regs.load(ADDR_CONFIG))
    }

    /// Whether an `init` has completed since the last reset.
    pub fn key_expanded(&self) -> bool {
        self.key_schedule.is_some()
    }

    fn on_write_control(&mut self, val: RegData) {
        let control = InMemoryRegister::<u32, Control::Register>::new(val);
        let init = control.is_set(Control::INIT);
        let next = control.is_set(Control::NEXT);
        if !init && !next {
            return;
        }

        if self.in_flight.is_some() {
            log::warn!("aes: command 0x{val:x} ignored while an operation is in flight");
            return;
        }

        let config = self.config();
        if init {
            let mut key = [0; KEY_WORDS];
            self.regs.load_words(ADDR_KEY0, &mut key);
            log::debug!("aes: init, {:?} key", config.key_length);
            let schedule = KeySchedule::expand(&key, config.key_length);
            self.start(Operation::KeyExpansion(schedule), self.timing.init_cycles);
        } else {
            let Some(schedule) = self.key_schedule.as_ref() else {
                log::warn!("aes: next ignored, no key has been expanded");
                return;
            };
            let mut block = [0; BLOCK_WORDS];
            self.regs.load_words(ADDR_BLOCK0, &mut block);
            log::debug!("aes: next, {:?}", config.direction);
            let result = schedule.process(config.direction, &block);
            self.start(Operation::Block(result), self.timing.next_cycles);
        }
    }

    fn start(&mut self, op: Operation, cycles: u64) {
        self.valid = false;
        self.in_flight = Some(InFlight {
            op,
            remaining: cycles.max(1),
        });
    }

    fn complete(&mut self, op: Operation) {
        match op {
            Operation::KeyExpansion(schedule) => {
                log::debug!("aes: key expansion complete");
                self.key_schedule = Some(schedule);
            }
            Operation::Block(result) => {
                log::debug!("aes: block complete");
                self.regs.store_words(ADDR_RESULT0, &result);
                self.valid = true;
            }
        }
    }
}

impl BridgedCore for AesCore {
    fn name(&self) -> &'static str {
        "aes"
    }

    fn read(&self, addr: RegisterAddress) -> RegData {
        if addr == ADDR_STATUS {
            self.status().word()
        } else {
            self.regs.read(addr)
        }
    }

    fn write(&mut self, addr: RegisterAddress, val: RegData) {
        if !self.regs.write(addr, val) {
            return;
        }
        if addr == ADDR_CTRL {
            self.on_write_control(val);
        }
    }

    fn reset(&mut self) {
        self.regs.store(ADDR_CTRL, 0);
        self.regs.store(ADDR_CONFIG, 0);
        self.key_schedule = None;
        self.in_flight = None;
        self.valid = false;
        self.in_reset = true;
    }

    fn tick(&mut self) {
        self.in_reset = false;
        if let Some(in_flight) = self.in_flight.as_mut() {
            in_flight.remaining -= 1;
            if in_flight.remaining == 0 {
                if let Some(done) = self.in_flight.take() {
                    self.complete(done.op);
                }
            }
        }
    }

    fn status(&self) -> CoreStatus {
        CoreStatus {
            ready: !self.in_reset && self.in_flight.is_none(),
            valid: self.valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctkey_emu_bridge::UNMAPPED_READ_VALUE;

    const NIST_AES128_KEY: [RegData; KEY_WORDS] =
        [0x2b7e1516, 0x28aed2a6, 0xabf71588, 0x09cf4f3c, 0, 0, 0, 0];
    const NIST_AES256_KEY: [RegData; KEY_WORDS] = [
        0x603deb10, 0x15ca71be, 0x2b73aef0, 0x857d7781, 0x1f352c07, 0x3b6108d7, 0x2d9810a3,
        0x0914dff4,
    ];
    const NIST_PLAINTEXT: [RegData; BLOCK_WORDS] = [0x6bc1bee2, 0x2e409f96, 0x93d7e117, 0x393172a0];
    const NIST_AES128_CIPHERTEXT: [RegData; RESULT_WORDS] =
        [0x3ad77bb4, 0x0d7a3660, 0xa89ecaf3, 0x2466ef97];
    const NIST_AES256_CIPHERTEXT: [RegData; RESULT_WORDS] =
        [0xf3eed1bd, 0xb5d2a03c, 0x064b5a7e, 0x3db181f8];

    fn write_words(core: &mut AesCore, base: RegisterAddress, words: &[RegData]) {
        for (i, word) in words.iter().enumerate() {
            core.write(base.offset(i as u8), *word);
        }
    }

    fn read_words(core: &AesCore, base: RegisterAddress) -> [RegData; RESULT_WORDS] {
        let mut out = [0; RESULT_WORDS];
        for (i, word) in out.iter_mut().enumerate() {
            *word = core.read(base.offset(i as u8));
        }
        out
    }

    /// Write a command and clock the core the way the bridge does.
    fn command(core: &mut AesCore, val: RegData) {
        core.write(ADDR_CTRL, val);
        core.tick();
    }

    fn run_until_ready(core: &mut AesCore) -> u64 {
        let mut cycles = 0;
        while !core.status().ready {
            core.tick();
            cycles += 1;
            assert!(cycles < 100, "core stuck busy");
        }
        cycles
    }

    fn ecb(
        core: &mut AesCore,
        key: &[RegData; KEY_WORDS],
        config: AesConfig,
        block: &[RegData; BLOCK_WORDS],
    ) -> [RegData; RESULT_WORDS] {
        write_words(core, ADDR_KEY0, key);
        core.write(ADDR_CONFIG, config.word());
        command(core, Control::INIT::SET.value);
        run_until_ready(core);
        write_words(core, ADDR_BLOCK0, block);
        command(core, Control::NEXT::SET.value);
        run_until_ready(core);
        assert!(core.status().valid);
        read_words(core, ADDR_RESULT0)
    }

    #[test]
    fn test_identity() {
        let core = AesCore::default();
        assert_eq!(core.read(ADDR_NAME0), 0x61657320);
        assert_eq!(core.read(ADDR_NAME1), 0x20202020);
        assert_eq!(core.read(ADDR_VERSION), 0x302e3630);
    }

    #[test]
    fn test_config_word() {
        let config = AesConfig::new(Direction::Encipher, KeyLength::Aes256);
        assert_eq!(config.word(), 0b11);
        assert_eq!(AesConfig::from_word(0b11), config);
        assert_eq!(
            AesConfig::from_word(0b10),
            AesConfig::new(Direction::Decipher, KeyLength::Aes256)
        );
        assert_eq!(
            AesConfig::new(Direction::Encipher, KeyLength::Aes128).word(),
            Config::ENCDEC::ENCIPHER.value
        );
        assert_eq!(KeyLength::Aes128.words(), 4);
        assert_eq!(KeyLength::Aes256.words(), 8);
    }

    #[test]
    fn test_power_on_status() {
        let core = AesCore::default();
        assert_eq!(core.read(ADDR_STATUS), 0b01);
        assert!(!core.key_expanded());
    }

    #[test]
    fn test_aes128_encipher() {
        let mut core = AesCore::default();
        let config = AesConfig::new(Direction::Encipher, KeyLength::Aes128);
        assert_eq!(
            ecb(&mut core, &NIST_AES128_KEY, config, &NIST_PLAINTEXT),
            NIST_AES128_CIPHERTEXT
        );
    }

    #[test]
    fn test_aes128_decipher() {
        let mut core = AesCore::default();
        let config = AesConfig::new(Direction::Decipher, KeyLength::Aes128);
        assert_eq!(
            ecb(&mut core, &NIST_AES128_KEY, config, &NIST_AES128_CIPHERTEXT),
            NIST_PLAINTEXT
        );
    }

    #[test]
    fn test_aes256_round_trip() {
        let mut core = AesCore::default();
        let enc = AesConfig::new(Direction::Encipher, KeyLength::Aes256);
        assert_eq!(
            ecb(&mut core, &NIST_AES256_KEY, enc, &NIST_PLAINTEXT),
            NIST_AES256_CIPHERTEXT
        );
        let dec = AesConfig::new(Direction::Decipher, KeyLength::Aes256);
        assert_eq!(
            ecb(&mut core, &NIST_AES256_KEY, dec, &NIST_AES256_CIPHERTEXT),
            NIST_PLAINTEXT
        );
    }

    #[test]
    fn test_operation_latency() {
        let mut core = AesCore::new(AesTiming {
            init_cycles: 5,
            next_cycles: 3,
        });
        write_words(&mut core, ADDR_KEY0, &NIST_AES128_KEY);
        command(&mut core, Control::INIT::SET.value);
        assert!(!core.status().ready);
        assert_eq!(run_until_ready(&mut core), 4);
        assert!(core.key_expanded());
        assert!(!core.status().valid);

        command(&mut core, Control::NEXT::SET.value);
        assert_eq!(core.status(), CoreStatus::default());
        assert_eq!(run_until_ready(&mut core), 2);
        assert!(core.status().valid);
    }

    #[test]
    fn test_command_ignored_while_busy() {
        let mut core = AesCore::default();
        let config = AesConfig::new(Direction::Encipher, KeyLength::Aes128);
        let first = ecb(&mut core, &NIST_AES128_KEY, config, &NIST_PLAINTEXT);

        write_words(&mut core, ADDR_BLOCK0, &[0; BLOCK_WORDS]);
        command(&mut core, Control::NEXT::SET.value);
        write_words(&mut core, ADDR_KEY0, &[0xffff_ffff; KEY_WORDS]);
        command(&mut core, Control::INIT::SET.value);
        run_until_ready(&mut core);

        // The second command was dropped, so the old key is still in use.
        write_words(&mut core, ADDR_BLOCK0, &NIST_PLAINTEXT);
        command(&mut core, Control::NEXT::SET.value);
        run_until_ready(&mut core);
        assert_eq!(read_words(&core, ADDR_RESULT0), first);
    }

    #[test]
    fn test_next_without_key_is_ignored() {
        let mut core = AesCore::default();
        write_words(&mut core, ADDR_BLOCK0, &NIST_PLAINTEXT);
        command(&mut core, Control::NEXT::SET.value);
        assert_eq!(
            core.status(),
            CoreStatus {
                ready: true,
                valid: false
            }
        );
    }

    #[test]
    fn test_init_wins_over_next() {
        let mut core = AesCore::new(AesTiming {
            init_cycles: 1,
            next_cycles: 1,
        });
        write_words(&mut core, ADDR_KEY0, &NIST_AES128_KEY);
        command(&mut core, (Control::INIT::SET + Control::NEXT::SET).value);
        assert!(core.key_expanded());
        assert!(!core.status().valid);
    }

    #[test]
    fn test_valid_cleared_by_next_command() {
        let mut core = AesCore::default();
        let config = AesConfig::new(Direction::Encipher, KeyLength::Aes128);
        ecb(&mut core, &NIST_AES128_KEY, config, &NIST_PLAINTEXT);
        assert!(core.status().valid);

        // Reading results does not consume them.
        read_words(&core, ADDR_RESULT0);
        assert!(core.status().valid);

        command(&mut core, Control::NEXT::SET.value);
        assert!(!core.status().valid);
    }

    #[test]
    fn test_read_only_ranges() {
        let mut core = AesCore::default();
        let config = AesConfig::new(Direction::Encipher, KeyLength::Aes128);
        ecb(&mut core, &NIST_AES128_KEY, config, &NIST_PLAINTEXT);

        write_words(&mut core, ADDR_RESULT0, &[0; RESULT_WORDS]);
        write_words(&mut core, ADDR_NAME0, &[0; 3]);
        core.write(ADDR_STATUS, 0);
        assert_eq!(read_words(&core, ADDR_RESULT0), NIST_AES128_CIPHERTEXT);
        assert_eq!(core.read(ADDR_NAME0), CORE_NAME0);
        assert!(core.status().valid);
    }

    #[test]
    fn test_unmapped_reads() {
        let mut core = AesCore::default();
        for addr in [0x03, 0x07, 0x0b, 0x18, 0x24, 0x34, 0x80].map(RegisterAddress::new) {
            core.write(addr, 0x1234_5678);
            assert_eq!(core.read(addr), UNMAPPED_READ_VALUE);
        }
    }

    #[test]
    fn test_reset() {
        let mut core = AesCore::default();
        let config = AesConfig::new(Direction::Encipher, KeyLength::Aes256);
        ecb(&mut core, &NIST_AES256_KEY, config, &NIST_PLAINTEXT);
        assert_eq!(core.read(ADDR_CTRL), Control::NEXT::SET.value);

        core.reset();
        assert_eq!(core.status(), CoreStatus::default());
        assert_eq!(core.read(ADDR_CTRL), 0);
        assert_eq!(core.read(ADDR_CONFIG), 0);
        assert!(!core.key_expanded());
        assert_eq!(core.read(ADDR_VERSION), CORE_VERSION);

        core.tick();
        assert_eq!(
            core.status(),
            CoreStatus {
                ready: true,
                valid: false
            }
        );
    }
}
