use crate::error::Fault;

/// Operations executed by the arithmetic/logic unit
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add = 0b1010_0000,
    Sub = 0b1010_0001,
    Mul = 0b1010_0010,
    Div = 0b1010_0011,
    Xor = 0b1010_1011,
    Shl = 0b1010_1100,
    Shr = 0b1010_1101,
}

impl TryFrom<u8> for AluOp {
    type Error = Fault;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0b1010_0000 => Ok(AluOp::Add),
            0b1010_0001 => Ok(AluOp::Sub),
            0b1010_0010 => Ok(AluOp::Mul),
            0b1010_0011 => Ok(AluOp::Div),
            0b1010_1011 => Ok(AluOp::Xor),
            0b1010_1100 => Ok(AluOp::Shl),
            0b1010_1101 => Ok(AluOp::Shr),
            _ => Err(Fault::UnsupportedOperation(byte)),
        }
    }
}

impl AluOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Mul => "MUL",
            AluOp::Div => "DIV",
            AluOp::Xor => "XOR",
            AluOp::Shl => "SHL",
            AluOp::Shr => "SHR",
        }
    }

    /// Compute the new value of the destination register `a` from `a` and the source register `b`
    pub fn apply(self, a: u8, b: u8) -> Result<u8, Fault> {
        let value = match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::Div => a.checked_div(b).ok_or(Fault::DivisionByZero)?,
            AluOp::Xor => a ^ b,
            // shifting by the register width or more clears every bit
            AluOp::Shl => a.checked_shl(b as u32).unwrap_or(0),
            AluOp::Shr => a.checked_shr(b as u32).unwrap_or(0),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::AluOp;
    use crate::error::Fault;

    #[test]
    fn test_decode() {
        assert_eq!(AluOp::try_from(0b1010_0010).unwrap(), AluOp::Mul);
        assert_eq!(AluOp::try_from(0b1010_1101).unwrap(), AluOp::Shr);
        assert!(matches!(
            AluOp::try_from(0b1011_1111),
            Err(Fault::UnsupportedOperation(0b1011_1111))
        ));
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(AluOp::Add.apply(200, 100).unwrap(), 44);
        assert_eq!(AluOp::Sub.apply(25, 100).unwrap(), 181);
        assert_eq!(AluOp::Mul.apply(16, 17).unwrap(), 16);
        assert_eq!(AluOp::Mul.apply(8, 9).unwrap(), 72);
    }

    #[test]
    fn test_div() {
        assert_eq!(AluOp::Div.apply(10, 3).unwrap(), 3);
        assert_eq!(AluOp::Div.apply(255, 1).unwrap(), 255);
        assert!(matches!(AluOp::Div.apply(10, 0), Err(Fault::DivisionByZero)));
    }

    #[test]
    fn test_div_then_mul_bounded_by_dividend() {
        for a in 0..=u8::MAX {
            for b in 1..=u8::MAX {
                let q = AluOp::Div.apply(a, b).unwrap();
                let back = q as u16 * b as u16;
                assert!(back <= a as u16);
                assert_eq!(back == a as u16, a % b == 0);
            }
        }
    }

    #[test]
    fn test_shifts() {
        assert_eq!(AluOp::Shl.apply(0b0010_0000, 1).unwrap(), 0b0100_0000);
        assert_eq!(AluOp::Shr.apply(0b0010_0000, 1).unwrap(), 0b0001_0000);
        assert_eq!(AluOp::Shr.apply(0b1000_0000, 7).unwrap(), 1);
        assert_eq!(AluOp::Shl.apply(0xFF, 8).unwrap(), 0);
        assert_eq!(AluOp::Shr.apply(0xFF, 200).unwrap(), 0);
    }

    #[test]
    fn test_xor_self_is_zero() {
        for v in 0..=u8::MAX {
            assert_eq!(AluOp::Xor.apply(v, v).unwrap(), 0);
        }
        assert_eq!(AluOp::Xor.apply(0b1001_0001, 0b1100_0001).unwrap(), 0b0101_0000);
    }
}
