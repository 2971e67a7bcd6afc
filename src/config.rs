use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::timer::Pacing;

#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WindowScale {
    #[value(name = "1")]
    X1,
    #[default]
    #[value(name = "2")]
    X2,
    #[value(name = "4")]
    X4,
}

impl From<WindowScale> for minifb::Scale {
    fn from(scale: WindowScale) -> Self {
        match scale {
            WindowScale::X1 => minifb::Scale::X1,
            WindowScale::X2 => minifb::Scale::X2,
            WindowScale::X4 => minifb::Scale::X4,
        }
    }
}

/// BytePusher virtual machine. Keys 0-F are mapped onto 1234/QWER/ASDF/ZXCV.
#[derive(Parser, Debug)]
#[command(name = "bytepusher", version, about)]
pub struct Args {
    /// Program image, loaded verbatim at address 0
    pub program: PathBuf,

    /// Window scale factor
    #[arg(long, value_enum, default_value_t = WindowScale::X2)]
    pub scale: WindowScale,

    /// Frame timing: truncated (16 ms), exact (1/60 s) or unlimited
    #[arg(long, value_enum, default_value_t = Pacing::Truncated)]
    pub pacing: Pacing,

    /// Don't open an audio device
    #[arg(long)]
    pub mute: bool,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
