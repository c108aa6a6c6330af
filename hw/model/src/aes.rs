// Licensed under the Apache-2.0 license

use std::fmt;

use ctkey_emu_bridge::CoreStatus;
use ctkey_emu_periph::{AesConfig, AesControl, Direction, KeyLength};
use ctkey_emu_types::consts::aes::*;
use ctkey_emu_types::RegData;

use crate::{HwModel, ModelError};

/// Control and data registers of the AES core as read back by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AesState {
    pub control: RegData,
    pub config: AesConfig,
    pub block: [RegData; BLOCK_WORDS],
}

impl fmt::Display for AesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "control: init = {}, next = {}",
            AesControl::INIT.read(self.control),
            AesControl::NEXT.read(self.control)
        )?;
        writeln!(
            f,
            "config: {:?}, {:?}",
            self.config.direction, self.config.key_length
        )?;
        write!(f, "block: ")?;
        for word in self.block {
            write!(f, "{word:08x}")?;
        }
        Ok(())
    }
}

/// Host driver for the AES core behind a bridge.
pub struct AesDriver<'a, M: HwModel> {
    model: &'a mut M,
}

impl<'a, M: HwModel> AesDriver<'a, M> {
    pub fn new(model: &'a mut M) -> Self {
        Self { model }
    }

    /// Pulse the core reset and wait until it reports ready.
    pub fn reset(&mut self) -> Result<(), ModelError> {
        log::info!("Resetting AES");
        self.model.reset_core()?;
        self.wait_ready()
    }

    /// Core name and version, e.g. `"aes     0.60"`.
    pub fn info(&mut self) -> Result<String, ModelError> {
        self.model.read_identity(ADDR_NAME0)
    }

    pub fn status(&mut self) -> Result<CoreStatus, ModelError> {
        Ok(CoreStatus::from_word(self.model.read_word(ADDR_STATUS)?))
    }

    pub fn is_ready(&mut self) -> Result<bool, ModelError> {
        Ok(self.status()?.ready)
    }

    pub fn wait_ready(&mut self) -> Result<(), ModelError> {
        self.model.poll_until("aes ready", |m| {
            Ok(CoreStatus::from_word(m.read_word(ADDR_STATUS)?).ready)
        })
    }

    /// Load the key words and key length, then issue `init`.
    ///
    /// Only the first [`KeyLength::words`] words take part in key expansion
    /// but all eight are written.
    pub fn init_key(
        &mut self,
        key: &[RegData; KEY_WORDS],
        key_length: KeyLength,
    ) -> Result<(), ModelError> {
        for (i, word) in key.iter().enumerate() {
            self.model.write_word(ADDR_KEY0.offset(i as u8), *word)?;
        }
        let config = AesConfig::new(Direction::Decipher, key_length);
        self.model.write_word(ADDR_CONFIG, config.word())?;
        self.model.write_word(ADDR_CTRL, AesControl::INIT::SET.value)
    }

    pub fn write_block(&mut self, block: &[RegData; BLOCK_WORDS]) -> Result<(), ModelError> {
        for (i, word) in block.iter().enumerate() {
            self.model.write_word(ADDR_BLOCK0.offset(i as u8), *word)?;
        }
        Ok(())
    }

    /// Write the config register and issue `next`.
    pub fn start(&mut self, config: AesConfig) -> Result<(), ModelError> {
        self.model.write_word(ADDR_CONFIG, config.word())?;
        self.model.write_word(ADDR_CTRL, AesControl::NEXT::SET.value)
    }

    /// Wait for the block in flight to complete.
    ///
    /// Fails with [`ModelError::UnexpectedStatus`] if the core goes idle
    /// without a valid result, which happens when the command was dropped.
    pub fn wait_valid(&mut self) -> Result<(), ModelError> {
        self.model.poll_until("aes valid", |m| {
            let status = CoreStatus::from_word(m.read_word(ADDR_STATUS)?);
            if status.valid {
                Ok(true)
            } else if status.ready {
                Err(ModelError::UnexpectedStatus {
                    status: status.word(),
                    expected: "a valid result",
                })
            } else {
                Ok(false)
            }
        })
    }

    pub fn read_result(&mut self) -> Result<[RegData; RESULT_WORDS], ModelError> {
        let mut result = [0; RESULT_WORDS];
        for (i, word) in result.iter_mut().enumerate() {
            *word = self.model.read_word(ADDR_RESULT0.offset(i as u8))?;
        }
        Ok(result)
    }

    pub fn dump_state(&mut self) -> Result<AesState, ModelError> {
        let control = self.model.read_word(ADDR_CTRL)?;
        let config = AesConfig::from_word(self.model.read_word(ADDR_CONFIG)?);
        let mut block = [0; BLOCK_WORDS];
        for (i, word) in block.iter_mut().enumerate() {
            *word = self.model.read_word(ADDR_BLOCK0.offset(i as u8))?;
        }
        Ok(AesState {
            control,
            config,
            block,
        })
    }

    /// Run one ECB block through the core with a freshly expanded key.
    pub fn ecb_single_block(
        &mut self,
        direction: Direction,
        key: &[RegData; KEY_WORDS],
        key_length: KeyLength,
        block: &[RegData; BLOCK_WORDS],
    ) -> Result<[RegData; RESULT_WORDS], ModelError> {
        self.init_key(key, key_length)?;
        self.wait_ready()?;
        self.write_block(block)?;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("AES state:\n{}", self.dump_state()?);
        }
        self.start(AesConfig::new(direction, key_length))?;
        self.wait_valid()?;
        self.read_result()
    }
}
