use crate::{error::Result, keyboard::Keyboard};

/// What the host hands the machine before each frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    /// false once the user asked to stop; the emulator doesn't care why
    pub running: bool,
    pub keys: Keyboard,
}

/// The I/O boundary the frame loop drives: window, speakers, keyboard.
///
/// Called in a fixed order each frame: `poll_input`, then (if the frame ran
/// to completion) `present` and `play_audio`. Any error ends the run.
pub trait Host {
    fn poll_input(&mut self) -> Result<Input>;

    /// `pixels` is 256x256 palette indices, row-major.
    fn present(&mut self, pixels: &[u8]) -> Result<()>;

    /// 256 signed 8-bit mono samples at 15360 Hz.
    fn play_audio(&mut self, samples: &[u8]) -> Result<()>;
}
