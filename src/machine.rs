use crate::{
    decode::{Instruction, RawInstruction, INSTRUCTION_WIDTH},
    error::Fault,
    keyboard::Keyboard,
    memory::{
        Memory, TypeAddr, AUDIO_BANK_ADDR, AUDIO_BUFFER_LEN, KEYBOARD_ADDR, PC_ADDR,
        PIXEL_BANK_ADDR, PIXEL_BUFFER_LEN,
    },
    registers::ProgramCounter,
};

pub const INSTRUCTIONS_PER_FRAME: usize = 65536;

/// Memory plus program counter; the whole machine state.
pub struct Machine {
    pub mem: Memory,
    pub pc: ProgramCounter,
    executed: usize,
}

impl Machine {
    pub fn new() -> Self {
        Self::with_memory(Memory::new())
    }

    pub fn with_memory(mem: Memory) -> Self {
        Self {
            mem,
            pc: ProgramCounter::default(),
            executed: 0,
        }
    }

    /// Decodes fresh from memory every time; programs rewrite their own code.
    pub fn fetch_decode(&self) -> Result<Instruction, Fault> {
        let pc = self.pc.addr();
        if pc as usize + INSTRUCTION_WIDTH > self.mem.len() {
            return Err(Fault::InvalidInstructionPointer { pc });
        }
        let bytes = self
            .mem
            .slice(pc as usize, INSTRUCTION_WIDTH)
            .try_into()
            .map_err(|_| Fault::InvalidInstructionPointer { pc })?;
        let ins = Instruction::decode_raw(RawInstruction::new(bytes));
        // can't trip with a full 24-bit memory, only with a smaller one
        if let Some(addr) = ins
            .operands()
            .into_iter()
            .find(|&addr| addr as usize >= self.mem.len())
        {
            return Err(Fault::InvalidOperandAddress { pc, addr });
        }
        Ok(ins)
    }

    pub fn execute_ins(&mut self, ins: Instruction) {
        let byte = self.mem.get(ins.src);
        self.mem.set(ins.dst, byte);
        self.pc.set_addr(ins.next);
    }

    pub fn step(&mut self) -> Result<(), Fault> {
        let ins = self.fetch_decode()?;
        self.execute_ins(ins);
        Ok(())
    }

    /// One frame: latch keys, reload the program counter from the header,
    /// then run the full instruction budget. Stops at the first fault.
    pub fn run_frame(&mut self, keys: &Keyboard) -> Result<(), Fault> {
        let [hi, lo] = keys.pack().to_be_bytes();
        self.mem.set(KEYBOARD_ADDR, hi);
        self.mem.set(KEYBOARD_ADDR + 1, lo);

        self.pc.set_addr(self.mem.read_u24(PC_ADDR));
        self.executed = 0;
        while self.executed < INSTRUCTIONS_PER_FRAME {
            self.step()?;
            self.executed += 1;
        }
        Ok(())
    }

    /// Instructions completed by the most recent `run_frame`.
    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn pixel_base(&self) -> usize {
        (self.mem.get(PIXEL_BANK_ADDR) as usize) << 16
    }

    pub fn audio_base(&self) -> usize {
        (self.mem.read_u16(AUDIO_BANK_ADDR) as usize) << 8
    }

    /// 256x256 row-major framebuffer, one palette index per pixel.
    pub fn pixels(&self) -> &[u8] {
        self.mem.slice(self.pixel_base(), PIXEL_BUFFER_LEN)
    }

    /// 256 signed 8-bit samples for this frame.
    pub fn audio(&self) -> &[u8] {
        self.mem.slice(self.audio_base(), AUDIO_BUFFER_LEN)
    }

    pub fn load(&mut self, program: &[u8]) -> crate::Result<()> {
        self.mem.load(program)?;
        self.pc.set_addr(0);
        Ok(())
    }

    pub fn write_program(&mut self, at: TypeAddr, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.mem.set(at + i as TypeAddr, *b);
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
