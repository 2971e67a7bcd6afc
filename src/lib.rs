// BytePusher: 24-bit address space, one instruction (ByteByteJump).
//
// Every instruction is 9 bytes: three 24-bit big-endian addresses.
//      A B C: copy the byte at A to B, then jump to C
//
// Memory header:
//      0..2   key state, key 0 in the top bit
//      2..5   program counter loaded at the start of every frame
//      5      pixel bank (x 65536)
//      6..8   audio bank (x 256)
//
// Each frame: latch keys, reload PC, run 65536 instructions, then draw the
// 256x256 pixel bank and play the 256 samples of the audio bank.
// Display: 256x256, 216 colour cube. Audio: 8-bit signed, 15360 Hz.

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod host;
pub mod keyboard;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod timer;
pub mod window;

pub use emulator::{Emulator, SchedulerState};
pub use error::{Error, Fault, Result};
pub use host::{Host, Input};
pub use machine::Machine;
