use crate::memory::TypeAddr;

/// The only register. Logically 24 bits, but may briefly hold anything a
/// jump can encode before the next fetch checks it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn addr(&self) -> TypeAddr {
        self.0
    }
}
