use crate::memory::{read_u24, TypeAddr};

pub const INSTRUCTION_WIDTH: usize = 9;

pub struct RawInstruction {
    bytes: [u8; INSTRUCTION_WIDTH],
    i: usize,
}

impl RawInstruction {
    pub fn new(bytes: &[u8; INSTRUCTION_WIDTH]) -> Self {
        RawInstruction { bytes: *bytes, i: 0 }
    }

    // iterator like, one 24-bit operand at a time
    pub fn next_address(&mut self) -> Option<TypeAddr> {
        if self.i >= INSTRUCTION_WIDTH {
            return None;
        }
        let addr = read_u24(&self.bytes[self.i..]);
        self.i += 3;
        Some(addr)
    }
}

/// ByteByteJump: copy the byte at `src` to `dst`, then jump to `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub src: TypeAddr,
    pub dst: TypeAddr,
    pub next: TypeAddr,
}

impl Instruction {
    pub fn decode_raw(mut raw: RawInstruction) -> Self {
        // a RawInstruction always holds exactly three operands
        let mut operand = || raw.next_address().unwrap_or_default();
        let src = operand();
        let dst = operand();
        let next = operand();
        Instruction { src, dst, next }
    }

    pub fn operands(&self) -> [TypeAddr; 3] {
        [self.src, self.dst, self.next]
    }

    pub fn encode(&self) -> [u8; INSTRUCTION_WIDTH] {
        let mut out = [0; INSTRUCTION_WIDTH];
        for (chunk, addr) in out.chunks_mut(3).zip(self.operands()) {
            chunk.copy_from_slice(&addr.to_be_bytes()[1..]);
        }
        out
    }
}
