//! A CHIP-8 virtual machine.
//!
//! [`Cpu`] owns the [`MachineState`] and executes one instruction per
//! [`Cpu::step`]. Rendering, input and the clock are driven from outside:
//! see [`screen`], [`keypad`] and the `chip8-vm` binary.

pub mod config;
pub mod cpu;
pub mod error;
pub mod instructions;
pub mod keypad;
pub mod logger;
pub mod opcode;
pub mod screen;
pub mod state;
pub mod util;

pub use cpu::{Cpu, Cycles};
pub use error::{InvalidOpcode, MachineError};
pub use opcode::{decode, Instruction};
pub use state::{MachineState, Mode};
