use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("program image is {len} bytes but memory holds {capacity}")]
    ProgramTooLarge { len: usize, capacity: usize },
    #[error(transparent)]
    Fault(#[from] Fault),
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
    #[error("audio error: {0}")]
    Audio(String),
}

/// Unrecoverable instruction faults. Either one ends the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("instruction pointer {pc:#08x} leaves no room for a 9 byte instruction")]
    InvalidInstructionPointer { pc: u32 },
    #[error("instruction at {pc:#08x} references out of range address {addr:#08x}")]
    InvalidOperandAddress { pc: u32, addr: u32 },
}
