mod alu;
mod dispatch;
mod error;
mod memory;
mod opcode;
pub mod program;
mod registers;

use std::fmt::Display as FmtDisplay;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use crate::alu::AluOp;
use crate::dispatch::DispatchTable;
use crate::memory::Memory;
use crate::opcode::{Instruction, Opcode};
use crate::registers::{Register, Registers};

pub use crate::error::{Fault, LoadError};

pub const MEM_SIZE: usize = 0x100;
pub const REGISTER_COUNT: usize = 8;
/// Initial stack pointer; the stack grows down from here
pub const STACK_TOP: u8 = 0xF4;

/// Where the program counter goes once an instruction has executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Move past the instruction, which is this many bytes long
    Advance(u8),
    /// Continue at an absolute address
    Jump(u8),
    Halt,
}

#[derive(Debug)]
pub enum State {
    Running,
    Halted,
    Faulted(Fault),
}

struct Ls8Config {
    trace: bool,
    step_limit: Option<usize>,
}

impl Ls8Config {
    pub fn new() -> Self {
        Self {
            trace: false,
            step_limit: None,
        }
    }
}

pub struct Ls8 {
    config: Ls8Config,
    /// 256 bytes of RAM holding the program image and the stack
    memory: Memory,
    /// 8 general-purpose registers R0 through R7
    registers: Registers,
    /// Opcode lookup for everything the ALU doesn't handle
    dispatch: DispatchTable,
    /// The program counter points to the current instruction in memory
    pc: usize,
    /// Points at the most recently pushed byte, or STACK_TOP when the stack is empty
    sp: u8,
    /// Length of the loaded image; pushes may not reach below this address
    program_len: usize,
    state: State,
    steps: usize,
}

impl Ls8 {
    pub fn new() -> Self {
        let mut ls8 = Ls8 {
            config: Ls8Config::new(),
            memory: Memory::new(),
            registers: Registers::new(),
            dispatch: DispatchTable::new(),
            pc: 0,
            sp: STACK_TOP,
            program_len: 0,
            state: State::Running,
            steps: 0,
        };
        ls8.reset();
        ls8
    }

    /// Put the machine back into its power-on state, keeping the config
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.registers = Registers::new();
        self.registers[Register::R7] = STACK_TOP;
        self.pc = 0;
        self.sp = STACK_TOP;
        self.program_len = 0;
        self.state = State::Running;
        self.steps = 0;
    }

    /* Config builder functions */
    pub fn trace(mut self, value: bool) -> Self {
        self.config.trace = value;
        self
    }

    pub fn step_limit(mut self, value: Option<usize>) -> Self {
        self.config.step_limit = value;
        self
    }

    /// Reset the machine and copy `image` into memory at address 0
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), LoadError> {
        self.reset();
        self.program_len = self.memory.load(image)?;
        log::debug!("loaded {} byte program", self.program_len);
        Ok(())
    }

    pub fn load_program_from_file(&mut self, path: PathBuf) -> anyhow::Result<()> {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("read program file {}", path.display()))?;
        let image = program::parse(&source).context("parse program")?;
        self.load_program(&image).context("load program into memory")?;
        Ok(())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running)
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        self.registers.values()
    }

    /// Run until the program halts or faults, writing printed values to `out`
    pub fn run<W: Write>(&mut self, out: &mut W) -> &State {
        while self.is_running() {
            self.step(out);
        }
        &self.state
    }

    /// Execute a single instruction. Does nothing once the machine has stopped.
    pub fn step<W: Write>(&mut self, out: &mut W) -> &State {
        if !self.is_running() {
            return &self.state;
        }

        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                self.state = State::Faulted(Fault::StepLimitExceeded(limit));
                return &self.state;
            }
        }

        if self.config.trace {
            eprintln!("{}", self.trace_line());
        }

        match self.execute(out) {
            Ok(Flow::Advance(len)) => self.pc += len as usize,
            Ok(Flow::Jump(addr)) => self.pc = addr as usize,
            Ok(Flow::Halt) => self.state = State::Halted,
            Err(fault) => {
                log::debug!("fault at {:#04x}: {}", self.pc, fault);
                self.state = State::Faulted(fault);
            }
        }
        self.steps += 1;

        &self.state
    }

    /// `TRACE: PC | next three bytes | R0..R7`, all in hex
    pub fn trace_line(&self) -> String {
        let peek = |offset: usize| {
            self.memory
                .data
                .get(self.pc + offset)
                .copied()
                .unwrap_or_default()
        };

        let mut line = format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc,
            peek(0),
            peek(1),
            peek(2)
        );
        for value in self.registers.values() {
            line.push_str(&format!(" {:02X}", value));
        }
        line
    }

    fn fetch(&self) -> Result<(Instruction, [u8; 2]), Fault> {
        let instruction = Instruction::decode(self.memory.read(self.pc)?);
        if instruction.operand_count > 2 {
            return Err(self.unknown_opcode(instruction));
        }

        let mut operands = [0; 2];
        for (i, operand) in operands
            .iter_mut()
            .take(instruction.operand_count as usize)
            .enumerate()
        {
            *operand = self.memory.read(self.pc + 1 + i)?;
        }

        Ok((instruction, operands))
    }

    fn execute<W: Write>(&mut self, out: &mut W) -> Result<Flow, Fault> {
        let (instruction, [a, b]) = self.fetch()?;
        log::trace!("{:#04x}: {}", self.pc, instruction);

        if instruction.alu {
            let op = AluOp::try_from(instruction.byte)?;
            self.op_alu(op, a, b)?;
            return Ok(Flow::Advance(instruction.len()));
        }

        let opcode = self
            .dispatch
            .lookup(instruction.byte)
            .ok_or_else(|| self.unknown_opcode(instruction))?;

        match opcode {
            Opcode::Hlt => {
                self.op_hlt();
                return Ok(Flow::Halt);
            }
            Opcode::Call => return self.op_call(a).map(Flow::Jump),
            Opcode::Ret => return self.op_ret().map(Flow::Jump),
            Opcode::Ldi => self.op_ldi(a, b)?,
            Opcode::Prn => self.op_prn(a, out)?,
            Opcode::Push => self.op_push(a)?,
            Opcode::Pop => self.op_pop(a)?,
        }

        Ok(Flow::Advance(instruction.len()))
    }

    fn unknown_opcode(&self, instruction: Instruction) -> Fault {
        Fault::UnknownOpcode {
            opcode: instruction.byte,
            address: self.pc,
        }
    }

    fn push_value(&mut self, value: u8) -> Result<(), Fault> {
        let sp = self
            .sp
            .checked_sub(1)
            .filter(|&sp| sp as usize >= self.program_len)
            .ok_or(Fault::StackOverflow { sp: self.sp })?;
        self.memory.write(sp as usize, value)?;
        self.sp = sp;
        Ok(())
    }

    fn pop_value(&mut self) -> Result<u8, Fault> {
        if self.sp >= STACK_TOP {
            return Err(Fault::StackUnderflow { sp: self.sp });
        }
        let value = self.memory.read(self.sp as usize)?;
        self.sp += 1;
        Ok(value)
    }

    /* Operations */

    fn op_alu(&mut self, op: AluOp, a: u8, b: u8) -> Result<(), Fault> {
        log::trace!("{} R{} R{}", op.mnemonic(), a, b);
        let (a, b) = (Register::try_from(a)?, Register::try_from(b)?);
        self.registers[a] = op.apply(self.registers[a], self.registers[b])?;
        Ok(())
    }

    /// 0b00000001
    fn op_hlt(&self) {
        log::trace!("{}", Opcode::Hlt.mnemonic());
        log::info!("code halting at {:#04x}", self.pc);
    }

    /// 0b10000010
    fn op_ldi(&mut self, reg: u8, value: u8) -> Result<(), Fault> {
        log::trace!("{} R{} {:#04x}", Opcode::Ldi.mnemonic(), reg, value);
        let reg = Register::try_from(reg)?;
        self.registers[reg] = value;
        Ok(())
    }

    /// 0b01000111
    fn op_prn<W: Write>(&mut self, reg: u8, out: &mut W) -> Result<(), Fault> {
        log::trace!("{} R{}", Opcode::Prn.mnemonic(), reg);
        let reg = Register::try_from(reg)?;
        writeln!(out, "{}", self.registers[reg])?;
        Ok(())
    }

    /// 0b01000101
    fn op_push(&mut self, reg: u8) -> Result<(), Fault> {
        log::trace!("{} R{}", Opcode::Push.mnemonic(), reg);
        let value = self.registers[Register::try_from(reg)?];
        self.push_value(value)
    }

    /// 0b01000110
    fn op_pop(&mut self, reg: u8) -> Result<(), Fault> {
        log::trace!("{} R{}", Opcode::Pop.mnemonic(), reg);
        let reg = Register::try_from(reg)?;
        self.registers[reg] = self.pop_value()?;
        Ok(())
    }

    /// 0b01010000
    fn op_call(&mut self, reg: u8) -> Result<u8, Fault> {
        log::trace!("{} R{}", Opcode::Call.mnemonic(), reg);
        let reg = Register::try_from(reg)?;
        let ret = self.pc + 2;
        let ret = u8::try_from(ret).map_err(|_| Fault::OutOfBounds(ret))?;
        self.push_value(ret)?;
        Ok(self.registers[reg])
    }

    /// 0b00010001
    fn op_ret(&mut self) -> Result<u8, Fault> {
        log::trace!("{}", Opcode::Ret.mnemonic());
        self.pop_value()
    }
}

impl FmtDisplay for Ls8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "=== Registers ===\npc: {:02X} sp: {:02X} {:02X?}",
            self.pc,
            self.sp,
            self.registers.values()
        )?;
        write!(f, "=== Memory ===\n{}", self.memory)
    }
}
