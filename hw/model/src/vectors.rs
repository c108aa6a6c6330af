// Licensed under the Apache-2.0 license

//! ECB known-answer vectors from NIST SP 800-38A (F.1.1, F.1.5) and
//! FIPS-197 (C.1, C.3).

use ctkey_emu_periph::KeyLength;
use ctkey_emu_types::consts::aes::{BLOCK_WORDS, KEY_WORDS, RESULT_WORDS};
use ctkey_emu_types::RegData;

pub const NIST_AES128_KEY1: [RegData; KEY_WORDS] =
    [0x2b7e1516, 0x28aed2a6, 0xabf71588, 0x09cf4f3c, 0, 0, 0, 0];

pub const NIST_AES128_KEY2: [RegData; KEY_WORDS] =
    [0x00010203, 0x04050607, 0x08090a0b, 0x0c0d0e0f, 0, 0, 0, 0];

pub const NIST_AES256_KEY1: [RegData; KEY_WORDS] = [
    0x603deb10, 0x15ca71be, 0x2b73aef0, 0x857d7781, 0x1f352c07, 0x3b6108d7, 0x2d9810a3, 0x0914dff4,
];

pub const NIST_AES256_KEY2: [RegData; KEY_WORDS] = [
    0x00010203, 0x04050607, 0x08090a0b, 0x0c0d0e0f, 0x10111213, 0x14151617, 0x18191a1b, 0x1c1d1e1f,
];

pub const NIST_PLAINTEXT: [[RegData; BLOCK_WORDS]; 5] = [
    [0x6bc1bee2, 0x2e409f96, 0x93d7e117, 0x393172a0],
    [0xae2d8a57, 0x1e03ac9c, 0x9eb76fac, 0x45af8e51],
    [0x30c81c46, 0xa35ce411, 0xe5fbc119, 0x1a0a52ef],
    [0xf69f2445, 0xdf4f9b17, 0xad2b417b, 0xe66c3710],
    [0x00112233, 0x44556677, 0x8899aabb, 0xccddeeff],
];

pub const NIST_ECB_128_ENC_EXPECTED: [[RegData; RESULT_WORDS]; 5] = [
    [0x3ad77bb4, 0x0d7a3660, 0xa89ecaf3, 0x2466ef97],
    [0xf5d3d585, 0x03b9699d, 0xe785895a, 0x96fdbaaf],
    [0x43b1cd7f, 0x598ece23, 0x881b00e3, 0xed030688],
    [0x7b0c785e, 0x27e8ad3f, 0x82232071, 0x04725dd4],
    [0x69c4e0d8, 0x6a7b0430, 0xd8cdb780, 0x70b4c55a],
];

pub const NIST_ECB_256_ENC_EXPECTED: [[RegData; RESULT_WORDS]; 5] = [
    [0xf3eed1bd, 0xb5d2a03c, 0x064b5a7e, 0x3db181f8],
    [0x591ccb10, 0xd410ed26, 0xdc5ba74a, 0x31362870],
    [0xb6ed21b9, 0x9ca6f4f9, 0xf153e7b1, 0xbeafed1d],
    [0x23304b7a, 0x39f9f3ff, 0x067d8d8f, 0x9e24ecc7],
    [0x8ea2b7ca, 0x516745bf, 0xeafc4990, 0x4b496089],
];

/// One single-block ECB known answer.
#[derive(Clone, Copy, Debug)]
pub struct EcbVector {
    pub name: &'static str,
    pub key: [RegData; KEY_WORDS],
    pub key_length: KeyLength,
    pub plaintext: [RegData; BLOCK_WORDS],
    pub ciphertext: [RegData; RESULT_WORDS],
}

const fn vector(
    name: &'static str,
    key: [RegData; KEY_WORDS],
    key_length: KeyLength,
    index: usize,
) -> EcbVector {
    let ciphertext = match key_length {
        KeyLength::Aes128 => NIST_ECB_128_ENC_EXPECTED[index],
        KeyLength::Aes256 => NIST_ECB_256_ENC_EXPECTED[index],
    };
    EcbVector {
        name,
        key,
        key_length,
        plaintext: NIST_PLAINTEXT[index],
        ciphertext,
    }
}

pub const ECB_VECTORS: [EcbVector; 10] = [
    vector("ecb-aes128 block 1", NIST_AES128_KEY1, KeyLength::Aes128, 0),
    vector("ecb-aes128 block 2", NIST_AES128_KEY1, KeyLength::Aes128, 1),
    vector("ecb-aes128 block 3", NIST_AES128_KEY1, KeyLength::Aes128, 2),
    vector("ecb-aes128 block 4", NIST_AES128_KEY1, KeyLength::Aes128, 3),
    vector("fips-197 aes128", NIST_AES128_KEY2, KeyLength::Aes128, 4),
    vector("ecb-aes256 block 1", NIST_AES256_KEY1, KeyLength::Aes256, 0),
    vector("ecb-aes256 block 2", NIST_AES256_KEY1, KeyLength::Aes256, 1),
    vector("ecb-aes256 block 3", NIST_AES256_KEY1, KeyLength::Aes256, 2),
    vector("ecb-aes256 block 4", NIST_AES256_KEY1, KeyLength::Aes256, 3),
    vector("fips-197 aes256", NIST_AES256_KEY2, KeyLength::Aes256, 4),
];
