use crate::{
    decode::Instruction,
    display::FrameBuffer,
    error::Result,
    memory::{glyph_address, CallStack, Memory, TypeAddr, DEFAULT_STACK_LIMIT},
    registers::{IndexRegister, ProgramCounter, Registers, FLAG_REGISTER},
};

#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub stack_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            stack_limit: DEFAULT_STACK_LIMIT,
        }
    }
}

// storage stays private, observers get read-only views
pub struct Machine {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    stack: CallStack,
    pc: ProgramCounter,
    index: IndexRegister,
    cycles: u64,
}

impl Machine {
    pub fn new(image: &[u8]) -> Result<Self> {
        Self::with_config(image, &MachineConfig::default())
    }

    pub fn with_config(image: &[u8], config: &MachineConfig) -> Result<Self> {
        let mut mem = Memory::new();
        mem.load(image)?;

        Ok(Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem,
            stack: CallStack::with_limit(config.stack_limit),
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            cycles: 0,
        })
    }

    pub fn fetch_decode(&self) -> Result<Instruction> {
        let ins = self.mem.read_word(self.pc.0 as usize)?;
        let decoded = Instruction::decode(ins);
        match &decoded {
            Ok(op) => log::trace!("{:#05x}: {ins:04x}  {op}", self.pc.0),
            Err(_) => log::trace!("{:#05x}: {ins:04x}  ???", self.pc.0),
        }
        decoded
    }

    pub fn step(&mut self) -> Result<Instruction> {
        let ins = self.fetch_decode()?;
        self.execute_ins(ins)?;
        self.cycles += 1;
        Ok(ins)
    }

    // every arm owns its PC update
    pub fn execute_ins(&mut self, ins: Instruction) -> Result<()> {
        match ins {
            Instruction::Return => {
                let addr = self.stack.pop()?;
                log::debug!("return {:#05x} -> {addr:#05x}", self.pc.0);
                self.pc.jump(addr);
            }
            Instruction::Call(addr) => {
                // store the following instruction to return back to
                self.stack.push(self.pc.next())?;
                log::debug!(
                    "call {addr:#05x} from {:#05x}, depth {}/{}",
                    self.pc.0,
                    self.stack.depth(),
                    self.stack.limit()
                );
                self.pc.jump(addr);
            }
            Instruction::SetRegister(vx, kk) => {
                self.regs.set_register(vx, kk);
                self.pc.advance();
            }
            Instruction::AddToRegister(vx, kk) => {
                self.regs.add_to_register(vx, kk);
                self.pc.advance();
            }
            Instruction::SetIndex(addr) => {
                self.index.set_addr(addr);
                self.pc.advance();
            }
            Instruction::Draw(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // From I to I + N, one byte per row, 8 pixels wide
                let mut sprite = Vec::with_capacity(height as usize);
                for row in 0..height as usize {
                    sprite.push(self.mem.read(self.index_offset(row))?);
                }

                let vf = self.fb.draw_sprite(x as usize, y as usize, &sprite)? as u8;
                self.regs.set_register(FLAG_REGISTER, vf);
                self.pc.advance();
            }
            Instruction::PointGlyph(digit) => {
                // the digit is the opcode's own X nibble, not the contents of VX
                self.index.set_addr(glyph_address(digit));
                self.pc.advance();
            }
            Instruction::StoreDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                for (i, digit) in digits.into_iter().enumerate() {
                    self.mem.write(self.index_offset(i), digit)?;
                }
                self.pc.advance();
            }
            Instruction::LoadRegisters(vx) => {
                for reg in 0..=vx {
                    let reg_val = self.mem.read(self.index_offset(reg as usize))?;
                    self.regs.set_register(reg, reg_val);
                }
                self.pc.advance();
            }
        }
        Ok(())
    }

    fn index_offset(&self, offset: usize) -> usize {
        self.index.0 as usize + offset
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn pc(&self) -> TypeAddr {
        self.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.index.0
    }

    // completed instructions only
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
