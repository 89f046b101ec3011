use tracing::warn;

use super::{
    Address, AddressAllocator, Backend, BackendConfig, BinaryOp, Condition, Operand,
};

/// One backend operation, as the compiler requested it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Load(Operand),
    Binary(BinaryOp, Operand),
    Branch {
        condition: Condition,
        target: Address,
    },
    Variable {
        name: Option<String>,
        size: u32,
    },
    Text(String),
    LoadParameter {
        register: usize,
        operand: Operand,
    },
    StoreParameter {
        register: usize,
        destination: Address,
    },
    Call(Address),
    Return,
}

impl Op {
    /// Bytes the operation occupies on the idealised machine.
    pub fn size(&self) -> u32 {
        match self {
            Op::Binary(BinaryOp::WordIndex | BinaryOp::ByteIndex, _) => 2,
            Op::Variable { size, .. } => *size,
            Op::Text(text) => text.len() as u32 + 1,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Emitted {
    pub address: Address,
    pub op: Op,
}

/// Reference backend: records every operation at the address it was given.
#[derive(Debug)]
pub struct RecordingBackend {
    allocator: AddressAllocator,
    emitted: Vec<Emitted>,
}

impl RecordingBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            allocator: AddressAllocator::new(config),
            emitted: vec![],
        }
    }

    pub fn emitted(&self) -> &[Emitted] {
        &self.emitted
    }

    /// Recorded operations without their addresses.
    pub fn ops(&self) -> Vec<&Op> {
        self.emitted.iter().map(|e| &e.op).collect()
    }

    pub fn allocator(&self) -> &AddressAllocator {
        &self.allocator
    }

    fn emit(&mut self, op: Op) -> Address {
        let address = self.allocator.reserve(op.size());
        self.emitted.push(Emitted { address, op });
        address
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}

impl Backend for RecordingBackend {
    fn current_address(&self) -> Address {
        self.allocator.pc()
    }

    fn word_size(&self) -> u32 {
        self.allocator.word_size()
    }

    fn load(&mut self, operand: Operand) {
        self.emit(Op::Load(operand));
    }

    fn binary_operation(&mut self, op: BinaryOp, operand: Operand) {
        self.emit(Op::Binary(op, operand));
    }

    fn branch(&mut self, condition: Condition, target: Address, at: Option<Address>) {
        let Some(at) = at else {
            self.emit(Op::Branch { condition, target });
            return;
        };

        let slot = self
            .emitted
            .iter_mut()
            .rev()
            .find(|e| e.address == at && matches!(e.op, Op::Branch { .. }));
        match slot {
            Some(slot) => slot.op = Op::Branch { condition, target },
            None => {
                warn!(at, "patching an address that holds no branch");
                self.emitted.push(Emitted {
                    address: at,
                    op: Op::Branch { condition, target },
                });
            }
        }
    }

    fn allocate_variable(&mut self, name: Option<&str>) -> Address {
        let size = self.allocator.word_size();
        self.emit(Op::Variable {
            name: name.map(str::to_string),
            size,
        })
    }

    fn create_string_constant(&mut self, text: &str) -> Address {
        self.emit(Op::Text(text.to_string()))
    }

    fn load_parameter_register(&mut self, register: usize, operand: Operand) {
        self.emit(Op::LoadParameter { register, operand });
    }

    fn store_parameter_register(&mut self, register: usize, destination: Address) {
        self.emit(Op::StoreParameter {
            register,
            destination,
        });
    }

    fn call(&mut self, target: Address) {
        self.emit(Op::Call(target));
    }

    fn return_from_procedure(&mut self) {
        self.emit(Op::Return);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_and_code_share_the_address_space() {
        let mut backend = RecordingBackend::default();
        assert_eq!(backend.create_string_constant("hi"), 0x1000);
        assert_eq!(backend.allocate_variable(Some("x")), 0x1003);
        backend.load(Operand::Constant(1));
        backend.binary_operation(BinaryOp::WordIndex, Operand::Constant(0));
        assert_eq!(backend.current_address(), 0x1008);
    }

    #[test]
    fn branch_override_patches_in_place() {
        let mut backend = RecordingBackend::default();
        let site = backend.current_address();
        backend.branch(Condition::Zero, site, None);
        backend.return_from_procedure();
        let end = backend.current_address();
        backend.branch(Condition::Zero, end, Some(site));

        assert_eq!(backend.current_address(), 0x1002);
        assert_eq!(
            backend.ops(),
            vec![
                &Op::Branch {
                    condition: Condition::Zero,
                    target: 0x1002
                },
                &Op::Return
            ]
        );
    }
}
