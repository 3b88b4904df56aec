use std::fmt;

use crate::error::{MachineError, Result};
use crate::memory::TypeAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit (1-based, from the left), m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask: u16 = if m >= 4 { 0xFFFF } else { (1 << (m * 4)) - 1 };
        (self.code >> shift_places) & mask
    }

    pub fn family(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

#[test]
fn test_bit_manip() {
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 1), 0xC);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(3, 1), 0xE);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 1), 0x4);

    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 2), 0x4C);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 2), 0xCE);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 4), 0x4CEE);
}

#[test]
fn test_fields() {
    let raw = RawInstruction::new(0xD12F);
    assert_eq!(raw.family(), 0xD);
    assert_eq!(raw.x(), 0x1);
    assert_eq!(raw.y(), 0x2);
    assert_eq!(raw.n(), 0xF);
    assert_eq!(raw.kk(), 0x2F);
    assert_eq!(raw.nnn(), 0x12F);
    assert!(raw == 0xD12F);
}

/// The complete instruction set. Anything else fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 00EE
    // return from subroutine, PC = popped address
    Return,
    // 2NNN
    // push the return address, jump to NNN
    Call(TypeAddr),
    // 6XKK
    // set register VX to value KK
    SetRegister(u8, u8),
    // 7XKK
    // add value KK to VX, no carry flag
    AddToRegister(u8, u8),
    // ANNN
    // set index register I to address NNN
    SetIndex(TypeAddr),
    // DXYN
    // draw an N pixel tall sprite from I at (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Draw(u8, u8, u8),
    // FX29
    // I = glyph address of digit X
    PointGlyph(u8),
    // FX33
    // hundreds, tens, ones of VX into I, I+1, I+2
    StoreDecimal(u8),
    // FX65
    // V0..=VX from memory at I
    LoadRegisters(u8),
}

impl Instruction {
    pub fn decode(ins: u16) -> Result<Self> {
        let raw = RawInstruction::new(ins);
        let unimplemented = Err(MachineError::UnimplementedOpcode(ins));

        match raw.family() {
            0x0 => match raw.kk() {
                // 0x0NNN machine-code routines share this family
                0xEE if raw.nth_m_digits(2, 1) == 0 => Ok(Self::Return),
                _ => unimplemented,
            },
            0x2 => Ok(Self::Call(raw.nnn())),
            0x6 => Ok(Self::SetRegister(raw.x(), raw.kk())),
            0x7 => Ok(Self::AddToRegister(raw.x(), raw.kk())),
            0xA => Ok(Self::SetIndex(raw.nnn())),
            0xD => Ok(Self::Draw(raw.x(), raw.y(), raw.n())),
            0xF => match raw.kk() {
                0x29 => Ok(Self::PointGlyph(raw.x())),
                0x33 => Ok(Self::StoreDecimal(raw.x())),
                0x65 => Ok(Self::LoadRegisters(raw.x())),
                _ => unimplemented,
            },
            _ => unimplemented,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Return => write!(f, "RET"),
            Self::Call(addr) => write!(f, "CALL {addr:#05x}"),
            Self::SetRegister(x, kk) => write!(f, "LD V{x:X}, {kk:#04x}"),
            Self::AddToRegister(x, kk) => write!(f, "ADD V{x:X}, {kk:#04x}"),
            Self::SetIndex(addr) => write!(f, "LD I, {addr:#05x}"),
            Self::Draw(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::PointGlyph(x) => write!(f, "LD F, {x:X}"),
            Self::StoreDecimal(x) => write!(f, "LD B, V{x:X}"),
            Self::LoadRegisters(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_supported_set() {
        assert_eq!(Instruction::decode(0x00EE), Ok(Instruction::Return));
        assert_eq!(Instruction::decode(0x2ABC), Ok(Instruction::Call(0xABC)));
        assert_eq!(
            Instruction::decode(0x6A42),
            Ok(Instruction::SetRegister(0xA, 0x42))
        );
        assert_eq!(
            Instruction::decode(0x7F01),
            Ok(Instruction::AddToRegister(0xF, 0x01))
        );
        assert_eq!(Instruction::decode(0xA210), Ok(Instruction::SetIndex(0x210)));
        assert_eq!(Instruction::decode(0xD125), Ok(Instruction::Draw(1, 2, 5)));
        assert_eq!(Instruction::decode(0xF329), Ok(Instruction::PointGlyph(3)));
        assert_eq!(Instruction::decode(0xF433), Ok(Instruction::StoreDecimal(4)));
        assert_eq!(Instruction::decode(0xF565), Ok(Instruction::LoadRegisters(5)));
    }

    #[test]
    fn clear_screen_is_not_supported() {
        assert_eq!(
            Instruction::decode(0x00E0),
            Err(MachineError::UnimplementedOpcode(0x00E0))
        );
    }

    #[test]
    fn rejects_everything_else() {
        for op in [
            0x0000, 0x01EE, 0x1200, 0x3000, 0x8014, 0xB000, 0xC0FF, 0xE09E, 0xF007, 0xF055,
            0xF11E,
        ] {
            assert_eq!(
                Instruction::decode(op),
                Err(MachineError::UnimplementedOpcode(op)),
                "{op:#06x}"
            );
        }
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Instruction::SetRegister(0, 5).to_string(), "LD V0, 0x05");
        assert_eq!(Instruction::Call(0x300).to_string(), "CALL 0x300");
        assert_eq!(Instruction::Draw(0xA, 0xB, 5).to_string(), "DRW VA, VB, 5");
        assert_eq!(Instruction::LoadRegisters(0xF).to_string(), "LD VF, [I]");
        assert_eq!(Instruction::PointGlyph(0xB).to_string(), "LD F, B");
    }
}
