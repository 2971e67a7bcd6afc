use std::{fs, path::Path};

use crate::error::{Error, Result};

pub type TypeAddr = u32; // in reality u24

pub const MEMORY_SIZE: usize = 1 << 24;

// header layout, shared with every BytePusher program
pub const KEYBOARD_ADDR: TypeAddr = 0;
pub const PC_ADDR: TypeAddr = 2;
pub const PIXEL_BANK_ADDR: TypeAddr = 5;
pub const AUDIO_BANK_ADDR: TypeAddr = 6;

pub const PIXEL_BUFFER_LEN: usize = 256 * 256;
pub const AUDIO_BUFFER_LEN: usize = 256;

/// Flat byte-addressed memory. Sized once, never grows.
///
/// Accessors index directly and panic on out of range addresses; bounds are
/// the instruction engine's job, not this buffer's.
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    pub fn new() -> Self {
        Self::with_len(MEMORY_SIZE)
    }

    /// A shrunk memory, only useful to exercise the bounds checks that can't
    /// fail with a full 24-bit address space.
    pub fn with_len(len: usize) -> Self {
        Self {
            bytes: vec![0; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[addr as usize] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[addr as usize]
    }

    pub fn slice(&self, start: usize, len: usize) -> &[u8] {
        &self.bytes[start..start + len]
    }

    pub fn read_u16(&self, addr: TypeAddr) -> u16 {
        let s = self.slice(addr as usize, 2);
        ((s[0] as u16) << 8) | s[1] as u16
    }

    pub fn read_u24(&self, addr: TypeAddr) -> u32 {
        read_u24(self.slice(addr as usize, 3))
    }

    pub fn reset(&mut self) {
        self.bytes.fill(0);
    }

    /// Copies a program image to address 0 and zeroes everything after it.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > self.len() {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                capacity: self.len(),
            });
        }
        self.bytes[..program.len()].copy_from_slice(program);
        self.bytes[program.len()..].fill(0);
        Ok(())
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let program = fs::read(path)?;
        self.load(&program)?;
        Ok(program.len())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Big-endian 24-bit value from the first three bytes.
pub fn read_u24(bytes: &[u8]) -> u32 {
    ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32
}
