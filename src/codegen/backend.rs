//! The abstract target machine the compiler emits into.
//!
//! The core never encodes anything itself: every operation goes through a
//! [`Backend`], which also owns the program counter and all storage
//! allocation. A backend must support forward references, so a branch can be
//! emitted with a provisional target and rewritten later through
//! [`Backend::branch`]'s `at` argument.

use std::fmt;

pub type Address = u32;

/// A value the accumulator can be combined with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// An immediate value.
    Constant(u32),
    /// The word stored at an address.
    Variable(Address),
}

impl Operand {
    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::Constant(_))
    }

    pub fn value(&self) -> u32 {
        match *self {
            Operand::Constant(v) | Operand::Variable(v) => v,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    /// `>`: write the accumulator to the operand.
    Store,
    /// `!`: add the operand, then read the word it points at.
    WordIndex,
    /// `?`: add the operand, then read the byte it points at.
    ByteIndex,
}

impl BinaryOp {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Mod => '%',
            BinaryOp::And => '&',
            BinaryOp::Or => '|',
            BinaryOp::Xor => '^',
            BinaryOp::Store => '>',
            BinaryOp::WordIndex => '!',
            BinaryOp::ByteIndex => '?',
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Branch test. Guards are compiled so the branch is taken when the
/// condition is false.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Always,
    Zero,
    NonZero,
    Positive,
}

pub trait Backend {
    /// Address the next emitted operation will occupy.
    fn current_address(&self) -> Address;

    /// Storage unit used for default variable allocation.
    fn word_size(&self) -> u32;

    fn load(&mut self, operand: Operand);

    fn binary_operation(&mut self, op: BinaryOp, operand: Operand);

    /// Emit a branch. With `at` set, no new slot is taken: the branch
    /// previously emitted at that address is rewritten to `target`.
    fn branch(&mut self, condition: Condition, target: Address, at: Option<Address>);

    fn allocate_variable(&mut self, name: Option<&str>) -> Address;

    fn create_string_constant(&mut self, text: &str) -> Address;

    /// Stage outgoing call argument `register`.
    fn load_parameter_register(&mut self, register: usize, operand: Operand);

    /// Copy incoming parameter `register` into local storage.
    fn store_parameter_register(&mut self, register: usize, destination: Address);

    fn call(&mut self, target: Address);

    fn return_from_procedure(&mut self);
}
