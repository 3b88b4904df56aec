// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
// call stack of return addresses, 16 deep by default
//
// Display res: 64 width, 32 height, XOR drawn
//
// opcodes are 2 bytes (big-endian)
//      NNN: address
//      KK: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod memory;
pub mod registers;
pub mod runner;
pub mod timer;
#[cfg(feature = "window")]
pub mod window;

pub use decode::Instruction;
pub use display::FrameBuffer;
pub use emulator::{Machine, MachineConfig};
pub use error::{Location, MachineError, Result};
pub use runner::{CancelToken, Exit, Frontend, Headless, RunConfig, Runner};
