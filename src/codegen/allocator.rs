use super::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Address of the first byte emitted.
    pub origin: Address,
    pub word_size: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: 0x1000,
            word_size: 2,
        }
    }
}

/// The running program counter of one compilation.
///
/// Code and data share one address space: instructions, variables and
/// string constants are all carved out of it in emission order.
#[derive(Clone, Debug)]
pub struct AddressAllocator {
    origin: Address,
    pc: Address,
    word_size: u32,
}

impl AddressAllocator {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            origin: config.origin,
            pc: config.origin,
            word_size: config.word_size,
        }
    }

    pub fn origin(&self) -> Address {
        self.origin
    }

    pub fn pc(&self) -> Address {
        self.pc
    }

    pub fn word_size(&self) -> u32 {
        self.word_size
    }

    /// Reserve `units` bytes and return where they start.
    pub fn reserve(&mut self, units: u32) -> Address {
        let start = self.pc;
        self.pc = self.pc.wrapping_add(units);
        start
    }

    /// Number of bytes handed out so far.
    pub fn used(&self) -> u32 {
        self.pc.wrapping_sub(self.origin)
    }
}
