use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::error::Result;

pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 256;

/// 6x6x6 colour cube; indices 216..=255 are black.
pub fn color8b(v: u8) -> (u8, u8, u8) {
    if v >= 216 {
        return (0, 0, 0);
    }
    let blue = (v % 6) * 0x33;
    let green = ((v / 6) % 6) * 0x33;
    let red = (v / 36) * 0x33;
    (red, green, blue)
}

fn from_u8_rgb((r, g, b): (u8, u8, u8)) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

pub struct FrameBuffer {
    palette: [u32; 256],
    pixel_buffer: Vec<u32>,
    pub window: Window,
}

impl FrameBuffer {
    pub fn new(scale: Scale) -> Result<Self> {
        let mut window = Window::new(
            "bytepusher - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )?;
        // the frame loop does its own pacing
        window.limit_update_rate(None);
        Ok(Self {
            palette: palette(),
            pixel_buffer: vec![0; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn paint(&mut self, pixels: &[u8]) {
        for (out, &v) in self.pixel_buffer.iter_mut().zip(pixels) {
            *out = self.palette[v as usize];
        }
    }

    pub fn sync(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::Yes)
    }
}

pub fn palette() -> [u32; 256] {
    let mut table = [0; 256];
    for (v, entry) in table.iter_mut().enumerate() {
        *entry = from_u8_rgb(color8b(v as u8));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_entries() {
        assert_eq!(color8b(0), (0, 0, 0));
        assert_eq!(color8b(216), (0, 0, 0));
        assert_eq!(color8b(255), (0, 0, 0));
    }

    #[test]
    fn test_cube_axes() {
        // 43 = 1*36 + 1*6 + 1
        assert_eq!(color8b(43), (0x33, 0x33, 0x33));
        assert_eq!(color8b(7), (0, 0x33, 0x33));
        assert_eq!(color8b(1), (0, 0, 0x33));
        assert_eq!(color8b(6), (0, 0x33, 0));
        assert_eq!(color8b(36), (0x33, 0, 0));
        assert_eq!(color8b(215), (0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn test_palette_packs_rgb() {
        let p = palette();
        assert_eq!(p[5], 0x0000FF);
        assert_eq!(p[30], 0x00FF00);
        assert_eq!(p[180], 0xFF0000);
        assert_eq!(p[250], 0);
    }
}
