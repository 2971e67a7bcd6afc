use minifb::Key;

pub const KEY_COUNT: usize = 16;

/// State of the 16 hex keys, indexed by key value (0x0..=0xF).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: [bool; KEY_COUNT]) -> Self {
        Self { keys }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn press(&mut self, n: u8) {
        self.keys[n as usize & 0xF] = true;
    }

    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys[n as usize & 0xF]
    }

    /// Key 0 lands in bit 15, key F in bit 0.
    pub fn pack(&self) -> u16 {
        self.keys
            .iter()
            .enumerate()
            .fold(0, |bits, (i, &down)| {
                if down {
                    bits | (0x8000 >> i)
                } else {
                    bits
                }
            })
    }

    pub fn update_from(&mut self, pressed: &[Key]) {
        self.reset();
        for n in pressed.iter().filter_map(key_to_num) {
            self.press(n);
        }
    }
}

// 1 2 3 C      1 2 3 4
// 4 5 6 D  <-  Q W E R
// 7 8 9 E      A S D F
// A 0 B F      Z X C V
pub fn key_to_num(key: &Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
