use minifb::Scale;

use crate::{
    display::FrameBuffer,
    error::Result,
    host::{Host, Input},
    keyboard::Keyboard,
    sound::Sound,
};

/// The desktop host: a minifb window for video and keys, cpal for audio.
pub struct WindowHost {
    fb: FrameBuffer,
    keyboard: Keyboard,
    sound: Option<Sound>,
}

impl WindowHost {
    pub fn new(scale: Scale, mute: bool) -> Result<Self> {
        let fb = FrameBuffer::new(scale)?;
        let sound = if mute { None } else { Some(Sound::new()?) };
        log::info!(
            "window open ({}), audio {}",
            match scale {
                Scale::X1 => "1x",
                Scale::X2 => "2x",
                Scale::X4 => "4x",
                _ => "scaled",
            },
            if sound.is_some() { "on" } else { "muted" }
        );
        Ok(Self {
            fb,
            keyboard: Keyboard::new(),
            sound,
        })
    }
}

impl Host for WindowHost {
    fn poll_input(&mut self) -> Result<Input> {
        self.keyboard.update_from(&self.fb.window.get_keys());
        Ok(Input {
            running: self.fb.is_running(),
            keys: self.keyboard,
        })
    }

    fn present(&mut self, pixels: &[u8]) -> Result<()> {
        self.fb.paint(pixels);
        self.fb.sync()
    }

    fn play_audio(&mut self, samples: &[u8]) -> Result<()> {
        if let Some(sound) = &self.sound {
            sound.queue(samples);
        }
        Ok(())
    }
}
