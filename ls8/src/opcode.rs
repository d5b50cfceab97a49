use std::fmt::Display;

/// Bits 7-6 of an instruction byte hold its operand count
const OPERAND_COUNT_MASK: u8 = 0b1100_0000;
const OPERAND_COUNT_SHIFT: u8 = 6;
/// Bit 5 marks opcodes that are routed to the ALU
const ALU_FLAG_MASK: u8 = 0b0010_0000;

/// Opcodes served by the dispatch table
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Hlt = 0b0000_0001,
    Ret = 0b0001_0001,
    Push = 0b0100_0101,
    Pop = 0b0100_0110,
    Prn = 0b0100_0111,
    Call = 0b0101_0000,
    Ldi = 0b1000_0010,
}

impl Opcode {
    pub const ALL: [Opcode; 7] = [
        Opcode::Hlt,
        Opcode::Ret,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Prn,
        Opcode::Call,
        Opcode::Ldi,
    ];

    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ret => "RET",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Prn => "PRN",
            Opcode::Call => "CALL",
            Opcode::Ldi => "LDI",
        }
    }
}

/// An instruction byte split into the fields the execution loop routes on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub byte: u8,
    pub operand_count: u8,
    pub alu: bool,
}

impl Instruction {
    pub fn decode(byte: u8) -> Self {
        Self {
            byte,
            operand_count: (byte & OPERAND_COUNT_MASK) >> OPERAND_COUNT_SHIFT,
            alu: byte & ALU_FLAG_MASK != 0,
        }
    }

    /// Number of bytes the instruction occupies, opcode included
    pub fn len(&self) -> u8 {
        self.operand_count + 1
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08b}", self.byte)
    }
}

#[cfg(test)]
mod tests {
    use super::{Instruction, Opcode};

    #[test]
    fn test_decode_operand_count() {
        assert_eq!(Instruction::decode(Opcode::Hlt.byte()).operand_count, 0);
        assert_eq!(Instruction::decode(Opcode::Ret.byte()).operand_count, 0);
        assert_eq!(Instruction::decode(Opcode::Prn.byte()).operand_count, 1);
        assert_eq!(Instruction::decode(Opcode::Call.byte()).operand_count, 1);
        assert_eq!(Instruction::decode(Opcode::Ldi.byte()).operand_count, 2);
        assert_eq!(Instruction::decode(0b1111_1111).operand_count, 3);
    }

    #[test]
    fn test_decode_alu_flag() {
        assert!(Instruction::decode(0b1010_0000).alu);
        assert!(Instruction::decode(0b1010_1101).alu);
        for opcode in Opcode::ALL {
            assert!(!Instruction::decode(opcode.byte()).alu, "{:?}", opcode);
        }
    }

    #[test]
    fn test_len() {
        assert_eq!(Instruction::decode(Opcode::Ldi.byte()).len(), 3);
        assert_eq!(Instruction::decode(Opcode::Push.byte()).len(), 2);
        assert_eq!(Instruction::decode(Opcode::Hlt.byte()).len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Instruction::decode(0b1000_0010).to_string(), "10000010");
    }
}
