use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MachineError>;

/// Where an out-of-range access landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Memory(usize),
    Pixel { x: usize, y: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Memory(addr) => write!(f, "memory address {addr:#05x}"),
            Location::Pixel { x, y } => write!(f, "pixel ({x}, {y})"),
        }
    }
}

/// Every variant is fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("opcode {0:#06x} is not implemented")]
    UnimplementedOpcode(u16),
    #[error("{0} is out of range")]
    AddressOutOfRange(Location),
    #[error("return with an empty call stack")]
    StackUnderflow,
    #[error("call stack exceeded its depth of {limit}")]
    StackOverflow { limit: usize },
    #[error("program image of {size} bytes does not fit in {capacity} bytes")]
    ImageTooLarge { size: usize, capacity: usize },
}
