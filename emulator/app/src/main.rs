/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains main entrypoint for the bridged core bring-up emulator.

--*/

use clap::Parser;
use ctkey_emu::{Emulator, EmulatorArgs};
use simple_logger::SimpleLogger;

fn main() -> anyhow::Result<()> {
    let cli = EmulatorArgs::parse();
    SimpleLogger::new().with_level(cli.log_level).init()?;
    Emulator::from_args(cli).run()
}
