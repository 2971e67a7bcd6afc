use anyhow::Context;
use clap::Parser;

use bytepusher::{config::Args, window::WindowHost, Emulator, Machine};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let mut machine = Machine::new();
    let len = machine
        .mem
        .load_file(&args.program)
        .with_context(|| format!("loading {}", args.program.display()))?;
    log::info!("loaded {} ({len} bytes)", args.program.display());

    let host = WindowHost::new(args.scale.into(), args.mute).context("starting host")?;
    let mut emu = Emulator::new(machine, host, args.pacing);
    if let Some(limit) = args.frames {
        emu = emu.with_frame_limit(limit);
    }

    emu.run()
        .with_context(|| format!("stopped after {} frames", emu.frames()))?;
    Ok(())
}
