use crate::memory::{TypeAddr, PROGRAM_START};

pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER: u8 = 0xF;
pub const INSTRUCTION_WIDTH: TypeAddr = 2;

// 16 8-bit data registers named V0 to VF
#[derive(Debug, Default)]
pub struct Registers {
    registers: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
        }
    }

    // reg_num comes out of a single nibble, so it is always < 16
    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0x0F) as usize] = value;
    }

    // wraps, VF is left alone
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0x0F) as usize]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.registers
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn advance(&mut self) {
        self.0 = self.0.wrapping_add(INSTRUCTION_WIDTH);
    }

    // address of the instruction after this one
    pub fn next(&self) -> TypeAddr {
        self.0.wrapping_add(INSTRUCTION_WIDTH)
    }

    pub fn jump(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

impl Default for ProgramCounter {
    fn default() -> Self {
        Self(PROGRAM_START)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}
