//! Mnemonic listing of a recording, one line per instruction or data
//! directive, in the idealised CPU's assembler syntax.

use std::fmt;

use super::{BinaryOp, Condition, Emitted, Op, Operand, RecordingBackend};

fn mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add | BinaryOp::WordIndex | BinaryOp::ByteIndex => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::Div => "div",
        BinaryOp::Mod => "mod",
        BinaryOp::And => "and",
        BinaryOp::Or => "ora",
        BinaryOp::Xor => "xor",
        BinaryOp::Store => "sta",
    }
}

fn test_prefix(condition: Condition) -> &'static str {
    match condition {
        Condition::Always => "",
        Condition::Zero => "z,",
        Condition::NonZero => "nz,",
        Condition::Positive => "p,",
    }
}

struct Source(Operand);

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Operand::Constant(v) => write!(f, "#${:04x}", v),
            Operand::Variable(a) => write!(f, "(${:04x})", a),
        }
    }
}

impl fmt::Display for Emitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = self.address;
        write!(f, "${:06x}  ", address)?;
        match &self.op {
            Op::Load(operand) => write!(f, "lda   {}", Source(*operand)),
            Op::Binary(op, operand) => {
                write!(f, "{:<6}{}", mnemonic(*op), Source(*operand))?;
                match op {
                    BinaryOp::WordIndex => write!(f, "\n${:06x}  lda.w [a]", address + 1),
                    BinaryOp::ByteIndex => write!(f, "\n${:06x}  lda.b [a]", address + 1),
                    _ => Ok(()),
                }
            }
            Op::Branch { condition, target } => {
                write!(f, "jmp   {}${:06x}", test_prefix(*condition), target)
            }
            Op::Variable { name, size } => {
                write!(f, "ds    ${:04x} ; {}", size, name.as_deref().unwrap_or(""))
            }
            Op::Text(text) => write!(f, "db    \"{}\",0", text),
            Op::LoadParameter { register, operand } => {
                write!(f, "ldp   p{},{}", register, Source(*operand))
            }
            Op::StoreParameter {
                register,
                destination,
            } => write!(f, "stp   p{},(${:04x})", register, destination),
            Op::Call(target) => write!(f, "jsr   ${:06x}", target),
            Op::Return => write!(f, "rts"),
        }
    }
}

impl fmt::Display for RecordingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for emitted in self.emitted() {
            writeln!(f, "{}", emitted)?;
        }
        Ok(())
    }
}
