use crate::error::{Location, MachineError, Result};

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_IMAGE_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const GLYPH_BYTES: usize = 5;
pub const DEFAULT_STACK_LIMIT: usize = 16;

type FontBytes = [u8; GLYPH_BYTES * 16];

pub const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Base address of the built-in glyph for a hex digit. Only the low nibble counts.
pub fn glyph_address(digit: u8) -> TypeAddr {
    (digit & 0x0F) as TypeAddr * GLYPH_BYTES as TypeAddr
}

pub struct Memory {
    // 4k bytes
    // font data stored from 000 -> 04F, programs from 200
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self { bytes }
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(MachineError::AddressOutOfRange(Location::Memory(addr)))
    }

    pub fn write(&mut self, addr: usize, val: u8) -> Result<()> {
        let cell = self
            .bytes
            .get_mut(addr)
            .ok_or(MachineError::AddressOutOfRange(Location::Memory(addr)))?;
        *cell = val;
        Ok(())
    }

    // big-endian: high byte first
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let (l, r) = (self.read(addr)?, self.read(addr + 1)?);
        Ok(((l as u16) << 8) | r as u16)
    }

    // loads program instructions starting at address 0x200
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > MAX_IMAGE_SIZE {
            return Err(MachineError::ImageTooLarge {
                size: image.len(),
                capacity: MAX_IMAGE_SIZE,
            });
        }
        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + image.len()].copy_from_slice(image);
        log::debug!(
            "loaded {} byte image at {:#05x}",
            image.len(),
            PROGRAM_START
        );
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CallStack {
    addresses: Vec<TypeAddr>,
    limit: usize,
}

impl CallStack {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_STACK_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            addresses: vec![],
            limit,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if self.addresses.len() >= self.limit {
            return Err(MachineError::StackOverflow { limit: self.limit });
        }
        self.addresses.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        self.addresses.pop().ok_or(MachineError::StackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.addresses.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
