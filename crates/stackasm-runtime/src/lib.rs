//! Evaluation machine for StackAssembly programs.
//!
//! The `stackasm-lang` crate turns script text into a
//! [`Program`](stackasm_lang::Program); this crate evaluates one. A
//! [`Machine`] owns the execution state (program counter, operand stack,
//! linear memory, call stack) and advances it with [`Machine::step`] or
//! [`Machine::run`].
//!
//! # Effects
//!
//! Scripts are sandboxed: they cannot reach the system the machine runs on.
//! All communication with the outside world goes through the host, the Rust
//! code driving the machine. Whenever evaluation cannot silently continue,
//! `step` and `run` report an [`Effect`]: the program finished, the script
//! suspended itself with `yield`, or an operator failed. On `yield` the host
//! reads requests from (and writes replies to) the operand stack and memory
//! through the machine's accessors, then calls [`Machine::resume`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use stackasm_lang::parse;
//! use stackasm_runtime::{Effect, Machine};
//!
//! let program = Arc::new(parse("1 2 +").unwrap());
//! let mut machine = Machine::new(program);
//!
//! assert_eq!(machine.run(), Effect::Finished);
//! assert_eq!(machine.stack().len(), 1);
//! assert_eq!(machine.stack()[0].to_i32(), 3);
//! ```
//!
//! A host servicing `yield`:
//!
//! ```
//! use std::sync::Arc;
//!
//! use stackasm_lang::parse;
//! use stackasm_runtime::{Effect, Machine};
//!
//! // Increments a number forever, handing it to the host each time around.
//! let program = Arc::new(parse("
//!     0
//!     increment:
//!         1 +
//!         yield
//!         @increment jump
//! ").unwrap());
//!
//! let mut machine = Machine::new(program);
//!
//! assert_eq!(machine.run(), Effect::Yield);
//! assert_eq!(machine.stack()[0].to_u32(), 1);
//!
//! machine.resume().unwrap();
//!
//! assert_eq!(machine.run(), Effect::Yield);
//! assert_eq!(machine.stack()[0].to_u32(), 2);
//! ```

mod effect;
mod machine;
mod memory;
mod stack;

pub use self::{
    effect::{Effect, ResumeError},
    machine::{Machine, MachineConfig, DEFAULT_MEMORY_WORDS},
};

pub use stackasm_lang::Word;
