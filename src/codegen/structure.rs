//! `if`/`while` lowering.
//!
//! A guard is compiled as its expression followed by a conditional branch
//! that is taken when the guard fails. The branch target is unknown until
//! the closing keyword, so the branch is emitted provisionally and its slot
//! remembered in a [`ControlFrame`] until it can be patched.

use crate::error::ErrorKind;
use crate::lexer::Comparison;

use super::{Address, Backend, Condition};

/// Branch test that skips a guarded block: the negation of the comparison.
pub fn failure_condition(comparison: Comparison) -> Condition {
    match comparison {
        Comparison::NotEqual => Condition::Zero,
        Comparison::Equal => Condition::NonZero,
        Comparison::Less => Condition::Positive,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlFrame {
    /// Bottom of every procedure's stack.
    Procedure,
    If {
        test: Condition,
        branch_site: Address,
    },
    While {
        test: Condition,
        loop_top: Address,
        branch_site: Address,
    },
}

#[derive(Debug)]
pub struct ControlStack {
    frames: Vec<ControlFrame>,
}

impl ControlStack {
    pub fn new() -> Self {
        Self {
            frames: vec![ControlFrame::Procedure],
        }
    }

    /// Open blocks, not counting the procedure frame.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn is_balanced(&self) -> bool {
        self.frames == [ControlFrame::Procedure]
    }

    fn emit_provisional<B: Backend>(test: Condition, backend: &mut B) -> Address {
        let branch_site = backend.current_address();
        backend.branch(test, branch_site, None);
        branch_site
    }

    /// Call once the guard expression has been compiled.
    pub fn open_if<B: Backend>(&mut self, test: Condition, backend: &mut B) {
        let branch_site = Self::emit_provisional(test, backend);
        self.frames.push(ControlFrame::If { test, branch_site });
    }

    /// `loop_top` is where the guard expression starts.
    pub fn open_while<B: Backend>(&mut self, test: Condition, loop_top: Address, backend: &mut B) {
        let branch_site = Self::emit_provisional(test, backend);
        self.frames.push(ControlFrame::While {
            test,
            loop_top,
            branch_site,
        });
    }

    fn pop(&mut self, closer: &'static str) -> Result<ControlFrame, ErrorKind> {
        match self.frames.pop() {
            Some(ControlFrame::Procedure) | None => {
                self.frames.push(ControlFrame::Procedure);
                Err(ErrorKind::MismatchedClose(closer))
            }
            Some(frame) => Ok(frame),
        }
    }

    pub fn close_if<B: Backend>(&mut self, backend: &mut B) -> Result<(), ErrorKind> {
        match self.pop("endif")? {
            ControlFrame::If { test, branch_site } => {
                backend.branch(test, backend.current_address(), Some(branch_site));
                Ok(())
            }
            _ => Err(ErrorKind::EndIfWithoutIf),
        }
    }

    pub fn close_while<B: Backend>(&mut self, backend: &mut B) -> Result<(), ErrorKind> {
        match self.pop("endwhile")? {
            ControlFrame::While {
                test,
                loop_top,
                branch_site,
            } => {
                backend.branch(Condition::Always, loop_top, None);
                backend.branch(test, backend.current_address(), Some(branch_site));
                Ok(())
            }
            _ => Err(ErrorKind::EndWhileWithoutWhile),
        }
    }
}

impl Default for ControlStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Op, Operand, RecordingBackend};

    fn branch(condition: Condition, target: Address) -> Op {
        Op::Branch { condition, target }
    }

    #[test]
    fn if_patches_to_the_end_of_the_block() {
        let mut backend = RecordingBackend::default();
        let mut stack = ControlStack::new();

        backend.load(Operand::Variable(0x40));
        stack.open_if(Condition::Zero, &mut backend);
        assert_eq!(stack.depth(), 1);
        backend.load(Operand::Constant(1));
        stack.close_if(&mut backend).unwrap();

        assert!(stack.is_balanced());
        assert_eq!(backend.ops()[1], &branch(Condition::Zero, 0x1003));
        assert_eq!(backend.current_address(), 0x1003);
    }

    #[test]
    fn while_jumps_back_and_exits_past_the_back_branch() {
        let mut backend = RecordingBackend::default();
        let mut stack = ControlStack::new();

        let top = backend.current_address();
        backend.load(Operand::Variable(0x40));
        stack.open_while(Condition::Zero, top, &mut backend);
        backend.load(Operand::Constant(1));
        stack.close_while(&mut backend).unwrap();

        assert_eq!(
            backend.ops(),
            vec![
                &Op::Load(Operand::Variable(0x40)),
                &branch(Condition::Zero, 0x1004),
                &Op::Load(Operand::Constant(1)),
                &branch(Condition::Always, 0x1000),
            ]
        );
    }

    #[test]
    fn nested_blocks_close_in_reverse() {
        let mut backend = RecordingBackend::default();
        let mut stack = ControlStack::new();

        stack.open_while(Condition::Zero, 0x1000, &mut backend);
        stack.open_if(Condition::NonZero, &mut backend);
        assert_eq!(stack.close_while(&mut backend), Err(ErrorKind::EndWhileWithoutWhile));

        let mut stack = ControlStack::new();
        stack.open_if(Condition::NonZero, &mut backend);
        stack.open_while(Condition::Zero, 0x1000, &mut backend);
        assert_eq!(stack.close_if(&mut backend), Err(ErrorKind::EndIfWithoutIf));
    }

    #[test]
    fn close_on_empty_stack() {
        let mut backend = RecordingBackend::default();
        let mut stack = ControlStack::new();
        assert_eq!(stack.close_if(&mut backend), Err(ErrorKind::MismatchedClose("endif")));
        assert_eq!(
            stack.close_while(&mut backend),
            Err(ErrorKind::MismatchedClose("endwhile"))
        );
        assert!(stack.is_balanced());
        assert!(backend.emitted().is_empty());
    }

    #[test]
    fn failure_tests() {
        assert_eq!(failure_condition(Comparison::NotEqual), Condition::Zero);
        assert_eq!(failure_condition(Comparison::Equal), Condition::NonZero);
        assert_eq!(failure_condition(Comparison::Less), Condition::Positive);
    }
}
