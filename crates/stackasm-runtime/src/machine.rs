//! The evaluation machine.

use std::sync::Arc;

use tracing::{debug, trace};

use stackasm_lang::{Builtin, Operator, Program, Word};

use crate::effect::{Effect, ResumeError};
use crate::memory::Memory;
use crate::stack::OperandStack;

/// Default memory size, in 32-bit words.
pub const DEFAULT_MEMORY_WORDS: usize = 65_536;

/// Construction-time configuration for a [`Machine`].
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Memory size in 32-bit words.
    pub memory_words: usize,
    /// Optional operand stack cap. With a cap set, any push past it raises
    /// [`Effect::StackOverflow`]; without one, depth is unbounded.
    pub stack_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_words: DEFAULT_MEMORY_WORDS,
            stack_limit: None,
        }
    }
}

/// Where the machine is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    /// Ready to evaluate the operator at the program counter.
    Running,
    /// Suspended at a `yield`, waiting for the host to resume.
    Suspended,
    /// Reached the end of the program. Terminal.
    Finished,
    /// An operator failed. Terminal; the effect is reported on every
    /// further step.
    Failed(Effect),
}

/// The ongoing evaluation of a program.
///
/// A machine owns one execution state: program counter, operand stack,
/// linear memory, and call stack. The program itself is shared and
/// immutable; any number of machines can evaluate the same
/// [`Program`] concurrently, each from its own state.
///
/// Drive it with [`Machine::step`] (one operator at a time) or
/// [`Machine::run`] (until the next [`Effect`]). While no step is in
/// flight, and in particular while the script is suspended at a `yield`,
/// the host owns the state and may inspect or mutate it through the
/// accessors.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use stackasm_lang::parse;
/// use stackasm_runtime::{Effect, Machine};
///
/// let program = Arc::new(parse("3 5 8 1 copy").unwrap());
/// let mut machine = Machine::new(program);
///
/// assert_eq!(machine.run(), Effect::Finished);
/// let stack: Vec<u32> = machine.stack().iter().map(|w| w.to_u32()).collect();
/// assert_eq!(stack, vec![3, 5, 8, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    program: Arc<Program>,
    /// Index of the next operator to evaluate.
    pc: u32,
    stack: OperandStack,
    memory: Memory,
    /// Return addresses pushed by `call` and `call_either`.
    call_stack: Vec<u32>,
    status: Status,
}

impl Machine {
    /// Create a machine over a parsed program with the default
    /// configuration.
    pub fn new(program: Arc<Program>) -> Self {
        Self::with_config(program, MachineConfig::default())
    }

    /// Create a machine with explicit memory size and stack cap.
    pub fn with_config(program: Arc<Program>, config: MachineConfig) -> Self {
        debug!(
            operators = program.operator_count(),
            memory_words = config.memory_words,
            stack_limit = ?config.stack_limit,
            "machine created"
        );

        Self {
            program,
            pc: 0,
            stack: OperandStack::new(config.stack_limit),
            memory: Memory::new(config.memory_words),
            call_stack: Vec::new(),
            status: Status::Running,
        }
    }

    /// Advance the evaluation by exactly one operator.
    ///
    /// Returns `None` when the machine advanced and can continue. Returns
    /// `Some` when something needs the host's attention instead:
    ///
    /// - [`Effect::Finished`] once the program counter passes the last
    ///   operator, and again on every later call
    /// - [`Effect::Yield`] when the script suspends, and again on every
    ///   later call until [`Machine::resume`]
    /// - any error effect once, and again on every later call; the machine
    ///   is halted and only [`Machine::reset`] revives it
    ///
    /// Never blocks. Each operator is atomic: its pops, pushes, memory
    /// writes, and program counter update all land before `step` returns,
    /// so observers only ever see state between operators.
    pub fn step(&mut self) -> Option<Effect> {
        match &self.status {
            Status::Suspended => return Some(Effect::Yield),
            Status::Finished => return Some(Effect::Finished),
            Status::Failed(effect) => return Some(effect.clone()),
            Status::Running => {}
        }

        let program = Arc::clone(&self.program);
        let Some(operator) = program.get(self.pc) else {
            self.status = Status::Finished;
            trace!(pc = self.pc, "finished");
            return Some(Effect::Finished);
        };

        // The program counter moves past the operator before the body runs.
        // Branch operators overwrite it; everything else leaves it be, so a
        // failing operator reports with the counter already pointing at the
        // next one.
        self.pc += 1;

        match self.execute(operator) {
            Ok(()) => None,
            Err(Effect::Yield) => {
                self.status = Status::Suspended;
                trace!(pc = self.pc, "yield");
                Some(Effect::Yield)
            }
            Err(effect) => {
                self.status = Status::Failed(effect.clone());
                trace!(pc = self.pc, %effect, "halted");
                Some(effect)
            }
        }
    }

    /// Advance the evaluation until it reports an effect.
    pub fn run(&mut self) -> Effect {
        loop {
            if let Some(effect) = self.step() {
                return effect;
            }
        }
    }

    /// Lift a `yield` suspension so stepping can continue.
    ///
    /// Legal only while the machine is suspended at a `yield`; anything else
    /// is host-side misuse and reports [`ResumeError`] without touching the
    /// state.
    pub fn resume(&mut self) -> Result<(), ResumeError> {
        match self.status {
            Status::Suspended => {
                self.status = Status::Running;
                Ok(())
            }
            _ => Err(ResumeError),
        }
    }

    /// Return the machine to its initial state: empty stacks, zeroed
    /// memory, program counter at 0. The program is kept; nothing is
    /// re-parsed.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.stack.clear();
        self.memory.clear();
        self.call_stack.clear();
        self.status = Status::Running;
    }

    /// The program this machine evaluates.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The index of the next operator to evaluate.
    pub fn program_counter(&self) -> u32 {
        self.pc
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[Word] {
        self.stack.values()
    }

    /// Push a word onto the operand stack.
    ///
    /// Meant for hosts servicing a `yield`; the configured stack cap still
    /// applies.
    pub fn push(&mut self, value: impl Into<Word>) -> Result<(), Effect> {
        self.stack.push(value)
    }

    /// Pop the top of the operand stack, if there is one.
    ///
    /// Meant for hosts servicing a `yield`.
    pub fn pop(&mut self) -> Option<Word> {
        self.stack.try_pop()
    }

    /// Return addresses of the calls currently in flight, oldest first.
    pub fn call_stack(&self) -> &[u32] {
        &self.call_stack
    }

    /// The whole memory, in address order.
    pub fn memory(&self) -> &[Word] {
        self.memory.values()
    }

    /// Read the memory word at `addr`.
    pub fn memory_read(&self, addr: u32) -> Result<Word, Effect> {
        self.memory.read(addr)
    }

    /// Store a word at `addr`.
    ///
    /// Meant for hosts servicing a `yield`.
    pub fn memory_write(&mut self, addr: u32, value: impl Into<Word>) -> Result<(), Effect> {
        self.memory.write(addr, value.into())
    }

    fn execute(&mut self, operator: &Operator) -> Result<(), Effect> {
        match operator {
            Operator::Integer(value) => self.stack.push(*value),
            Operator::Reference(index) => self.stack.push(*index),
            Operator::Builtin(builtin) => self.execute_builtin(*builtin),
            Operator::Unknown(name) => Err(Effect::UnknownIdentifier(name.clone())),
        }
    }

    fn execute_builtin(&mut self, builtin: Builtin) -> Result<(), Effect> {
        match builtin {
            Builtin::Add => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                self.stack.push(a.wrapping_add(b))
            }
            Builtin::Sub => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                self.stack.push(a.wrapping_sub(b))
            }
            Builtin::Mul => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                self.stack.push(a.wrapping_mul(b))
            }
            Builtin::Div => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                if b == 0 {
                    return Err(Effect::DivideByZero);
                }
                if a == i32::MIN && b == -1 {
                    return Err(Effect::DivideOverflow);
                }

                self.stack.push(a / b)?;
                self.stack.push(a % b)
            }
            Builtin::And => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_u32();
                let a = self.stack.pop().to_u32();

                self.stack.push(a & b)
            }
            Builtin::Or => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_u32();
                let a = self.stack.pop().to_u32();

                self.stack.push(a | b)
            }
            Builtin::Xor => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_u32();
                let a = self.stack.pop().to_u32();

                self.stack.push(a ^ b)
            }
            Builtin::CountOnes => {
                self.stack.require(1)?;
                let a = self.stack.pop().to_u32();

                self.stack.push(a.count_ones())
            }
            Builtin::LeadingZeros => {
                self.stack.require(1)?;
                let a = self.stack.pop().to_u32();

                self.stack.push(a.leading_zeros())
            }
            Builtin::TrailingZeros => {
                self.stack.require(1)?;
                let a = self.stack.pop().to_u32();

                self.stack.push(a.trailing_zeros())
            }
            Builtin::RotateLeft => {
                self.stack.require(2)?;
                let n = self.stack.pop().to_u32();
                let a = self.stack.pop().to_u32();

                self.stack.push(a.rotate_left(n))
            }
            Builtin::RotateRight => {
                self.stack.require(2)?;
                let n = self.stack.pop().to_u32();
                let a = self.stack.pop().to_u32();

                self.stack.push(a.rotate_right(n))
            }
            Builtin::ShiftLeft => {
                self.stack.require(2)?;
                let n = self.stack.pop().to_u32();
                let a = self.stack.pop().to_u32();

                // Logical shift; the count wraps at the word width.
                self.stack.push(a << (n % 32))
            }
            Builtin::ShiftRight => {
                self.stack.require(2)?;
                let n = self.stack.pop().to_u32();
                let a = self.stack.pop().to_i32();

                // Arithmetic shift: the sign bit extends.
                self.stack.push(a >> (n % 32))
            }
            Builtin::Eq => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                self.stack.push(a == b)
            }
            Builtin::Gt => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                self.stack.push(a > b)
            }
            Builtin::Ge => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                self.stack.push(a >= b)
            }
            Builtin::Lt => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                self.stack.push(a < b)
            }
            Builtin::Le => {
                self.stack.require(2)?;
                let b = self.stack.pop().to_i32();
                let a = self.stack.pop().to_i32();

                self.stack.push(a <= b)
            }
            Builtin::Jump => {
                self.stack.require(1)?;
                let target = self.stack.pop().to_u32();

                self.branch(target)
            }
            Builtin::JumpIf => {
                self.stack.require(2)?;
                let target = self.stack.pop().to_u32();
                let condition = self.stack.pop().to_bool();

                if condition {
                    self.branch(target)?;
                }

                Ok(())
            }
            Builtin::Call => {
                self.stack.require(1)?;
                let target = self.stack.pop().to_u32();

                // The counter already points past the call; that is the
                // return address.
                let return_to = self.pc;
                self.branch(target)?;
                self.call_stack.push(return_to);

                Ok(())
            }
            Builtin::CallEither => {
                self.stack.require(3)?;
                let else_ = self.stack.pop().to_u32();
                let then = self.stack.pop().to_u32();
                let condition = self.stack.pop().to_bool();

                let return_to = self.pc;
                self.branch(if condition { then } else { else_ })?;
                self.call_stack.push(return_to);

                Ok(())
            }
            Builtin::Return => {
                match self.call_stack.pop() {
                    Some(return_to) => self.pc = return_to,
                    // With no call in flight, `return` ends the program:
                    // park the counter at the end and let the next step
                    // report it.
                    None => self.pc = self.program.operator_count(),
                }

                Ok(())
            }
            Builtin::Copy => {
                self.stack.require(1)?;
                let index = self.stack.pop().to_u32() as usize;

                let value = self.stack.get(index).ok_or(Effect::StackUnderflow {
                    needed: index + 1,
                    had: self.stack.depth(),
                })?;

                self.stack.push(value)
            }
            Builtin::Drop => {
                self.stack.require(1)?;
                let index = self.stack.pop().to_u32() as usize;

                let had = self.stack.depth();
                match self.stack.remove(index) {
                    Some(_) => Ok(()),
                    None => Err(Effect::StackUnderflow {
                        needed: index + 1,
                        had,
                    }),
                }
            }
            Builtin::Read => {
                self.stack.require(1)?;
                let addr = self.stack.pop().to_u32();

                let value = self.memory.read(addr)?;
                self.stack.push(value)
            }
            Builtin::Write => {
                self.stack.require(2)?;
                let addr = self.stack.pop().to_u32();
                let value = self.stack.pop();

                self.memory.write(addr, value)
            }
            Builtin::Assert => {
                self.stack.require(1)?;
                let condition = self.stack.pop().to_bool();

                if condition {
                    Ok(())
                } else {
                    Err(Effect::AssertionFailed)
                }
            }
            Builtin::Yield => Err(Effect::Yield),
        }
    }

    /// Redirect the program counter, validating the target first.
    fn branch(&mut self, target: u32) -> Result<(), Effect> {
        let program_size = self.program.operator_count();
        if target >= program_size {
            return Err(Effect::BadJumpTarget {
                target,
                program_size,
            });
        }

        self.pc = target;
        Ok(())
    }
}
