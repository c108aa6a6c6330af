/*++

Licensed under the Apache-2.0 license.

File Name:

    emulator.rs

Abstract:

    File contains the command line and the bring-up sequences run against
    the emulated bridge.

--*/

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use clap_num::maybe_hex;
use ctkey_emu_bridge::{BridgeConfig, WriteEnablePolicy};
use ctkey_emu_periph::{AesCore, AesTiming, Direction, TimerCore};
use ctkey_hw_model::vectors::ECB_VECTORS;
use ctkey_hw_model::{
    AesDriver, HwModel, InitParams, ModelEmulated, TimerDriver, DEFAULT_POLL_LIMIT,
};
use log::LevelFilter;

fn parse_log_level(s: &str) -> Result<LevelFilter, String> {
    s.trim().parse().map_err(|_| {
        format!(
            "Invalid log level: {}. Supported levels are off, error, warn, info, debug and trace.",
            s
        )
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CoreKind {
    /// AES-128/256 block cipher, runs the NIST ECB self-test
    Aes,
    /// Prescaled timer, runs the counter demo
    Timer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WriteEnableArg {
    /// WE drops on the edge that commits the write
    Pulse,
    /// WE is held by the host
    Level,
}

impl From<WriteEnableArg> for WriteEnablePolicy {
    fn from(arg: WriteEnableArg) -> Self {
        match arg {
            WriteEnableArg::Pulse => WriteEnablePolicy::Pulse,
            WriteEnableArg::Level => WriteEnablePolicy::Level,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, name = "Bridged Core Emulator")]
pub struct EmulatorArgs {
    /// Core wired behind the bridge.
    #[arg(long, value_enum, default_value_t = CoreKind::Aes)]
    pub core: CoreKind,

    #[arg(long, value_enum, default_value_t = WriteEnableArg::Pulse)]
    pub write_enable: WriteEnableArg,

    /// AES key expansion latency in cycles.
    #[arg(long, default_value_t = AesTiming::default().init_cycles)]
    pub init_cycles: u64,

    /// AES block latency in cycles.
    #[arg(long, default_value_t = AesTiming::default().next_cycles)]
    pub next_cycles: u64,

    /// Timer prescaler.
    #[arg(long, value_parser=maybe_hex::<u32>, default_value = "0x4")]
    pub prescaler: u32,

    /// Number of timer values to print.
    #[arg(long, default_value_t = 8)]
    pub samples: usize,

    /// Cycles between timer samples.
    #[arg(long, default_value_t = 100)]
    pub sample_interval: u64,

    /// Cycles a status poll may spin before failing.
    #[arg(long, default_value_t = DEFAULT_POLL_LIMIT)]
    pub poll_limit: u64,

    /// off, error, warn, info (default), debug or trace
    #[arg(long, value_parser = parse_log_level, default_value = "info")]
    pub log_level: LevelFilter,
}

/// Outcome of the AES self-test.
#[derive(Clone, Debug, Default)]
pub struct AesReport {
    pub info: String,
    pub passed: usize,
    pub failed: Vec<String>,
}

pub struct Emulator {
    args: EmulatorArgs,
}

impl Emulator {
    pub fn from_args(args: EmulatorArgs) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &EmulatorArgs {
        &self.args
    }

    fn init_params(&self, status_register: bool) -> InitParams {
        InitParams {
            bridge: BridgeConfig::new(self.args.write_enable.into()),
            status_register,
            poll_limit: self.args.poll_limit,
        }
    }

    /// Run the sequence for the selected core. Fails if any AES vector
    /// does not match.
    pub fn run(&self) -> Result<()> {
        match self.args.core {
            CoreKind::Aes => {
                let report = self.run_aes()?;
                println!(
                    "{}/{} test cases passed",
                    report.passed,
                    report.passed + report.failed.len()
                );
                if !report.failed.is_empty() {
                    bail!("failed test cases: {}", report.failed.join(", "));
                }
            }
            CoreKind::Timer => {
                self.run_timer()?;
            }
        }
        Ok(())
    }

    /// Reset the AES core, print its identity and run every ECB vector in
    /// both directions.
    pub fn run_aes(&self) -> Result<AesReport> {
        let timing = AesTiming {
            init_cycles: self.args.init_cycles,
            next_cycles: self.args.next_cycles,
        };
        let mut hw = ModelEmulated::new(AesCore::new(timing), self.init_params(false));
        let mut aes = AesDriver::new(&mut hw);

        aes.reset().context("AES reset")?;
        let mut report = AesReport {
            info: aes.info().context("AES identity")?,
            ..Default::default()
        };
        println!("AES core name: {}", report.info);

        let cases = ECB_VECTORS.into_iter().flat_map(|vector| {
            [
                (Direction::Encipher, vector.plaintext, vector.ciphertext),
                (Direction::Decipher, vector.ciphertext, vector.plaintext),
            ]
            .map(move |(direction, input, expected)| (vector, direction, input, expected))
        });
        for (tc, (vector, direction, input, expected)) in cases.enumerate() {
            let tc = tc + 1;
            println!("Running test case {tc}: {} {direction:?}", vector.name);
            let result = aes
                .ecb_single_block(direction, &vector.key, vector.key_length, &input)
                .with_context(|| format!("test case {tc}"))?;
            if result == expected {
                println!("Test case {tc} passed");
                report.passed += 1;
            } else {
                println!("Test case {tc} failed");
                println!("Expected: {}", hex_words(&expected));
                println!("Got: {}", hex_words(&result));
                report.failed.push(format!("{tc} ({} {direction:?})", vector.name));
            }
        }
        log::info!("{} cycles", hw.cycle_count());
        Ok(report)
    }

    /// Start the timer and sample it at a fixed interval.
    pub fn run_timer(&self) -> Result<Vec<u32>> {
        let mut hw = ModelEmulated::new(TimerCore::new(), self.init_params(true));
        let mut samples = Vec::with_capacity(self.args.samples);
        {
            let mut timer = TimerDriver::new(&mut hw);
            println!("Waiting for timer to be ready...");
            timer.wait_ready().context("timer ready")?;
            println!("Timer core name: {}", timer.info().context("timer identity")?);
            timer
                .set_prescaler(self.args.prescaler)
                .context("timer prescaler")?;
            println!("Waiting for timer to start...");
            timer.start().context("timer start")?;
            println!("Timer has started!");
        }

        for _ in 0..self.args.samples {
            hw.step_n(self.args.sample_interval);
            let t = TimerDriver::new(&mut hw).read().context("timer read")?;
            println!("Timer: {t}");
            samples.push(t);
        }
        TimerDriver::new(&mut hw).stop().context("timer stop")?;
        Ok(samples)
    }
}

fn hex_words(words: &[u32]) -> String {
    words.iter().map(|w| format!("{w:08x}")).collect()
}
