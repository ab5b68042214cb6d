use thiserror::Error;

/// Raised by the decoder when a fetched word matches no instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid opcode {0:#06x}")]
pub struct InvalidOpcode(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("cannot load program: {size} bytes exceed the {capacity} bytes of program space")]
    Capacity { size: usize, capacity: usize },
    #[error("invalid opcode {opcode:#06x} at {pc:#05x}")]
    InvalidOpcode { opcode: u16, pc: u16 },
}

impl MachineError {
    pub(crate) fn at(InvalidOpcode(opcode): InvalidOpcode, pc: u16) -> Self {
        MachineError::InvalidOpcode { opcode, pc }
    }
}
