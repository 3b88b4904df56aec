use std::fmt;

use crate::error::{Location, MachineError, Result};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome display surface. Pixels only ever change by XOR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: Vec<bool>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: vec![false; WIDTH * HEIGHT],
        }
    }

    fn index(x: usize, y: usize) -> Result<usize> {
        if x >= WIDTH || y >= HEIGHT {
            return Err(MachineError::AddressOutOfRange(Location::Pixel { x, y }));
        }
        Ok((y * WIDTH) + x)
    }

    /// XORs `bit` into the pixel at `(x, y)`. Returns whether a lit pixel went dark.
    pub fn xor_pixel(&mut self, x: usize, y: usize, bit: bool) -> Result<bool> {
        let index = Self::index(x, y)?;
        let previous = self.bit_buffer[index];
        self.bit_buffer[index] ^= bit;
        Ok(previous && !self.bit_buffer[index])
    }

    /// Draws one sprite row per byte, most significant bit leftmost, starting at `(x, y)`.
    /// The returned flag is true if any lit pixel was cleared.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> Result<bool> {
        let mut collision = false;
        for (i, row) in sprite.iter().enumerate() {
            for j in 0..8 {
                let bit = (row >> (7 - j)) & 1 == 1;
                collision |= self.xor_pixel(x + j, y + i, bit)?;
            }
        }
        Ok(collision)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        Self::index(x, y).ok().map(|index| self.bit_buffer[index])
    }

    pub fn lit_count(&self) -> usize {
        self.bit_buffer.iter().filter(|lit| **lit).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.bit_buffer.chunks(WIDTH)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for lit in row {
                f.write_str(if *lit { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
