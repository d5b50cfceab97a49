use std::ops::{Index, IndexMut};

use crate::error::Fault;
use crate::REGISTER_COUNT;

/// A register index that is known to lie inside the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register(u8);

impl Register {
    pub const R7: Register = Register(7);
}

impl TryFrom<u8> for Register {
    type Error = Fault;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if (index as usize) < REGISTER_COUNT {
            Ok(Self(index))
        } else {
            Err(Fault::RegisterOutOfBounds(index))
        }
    }
}

pub struct Registers([u8; REGISTER_COUNT]);

impl Index<Register> for Registers {
    type Output = u8;

    fn index(&self, register: Register) -> &Self::Output {
        &self.0[register.0 as usize]
    }
}

impl IndexMut<Register> for Registers {
    fn index_mut(&mut self, register: Register) -> &mut Self::Output {
        &mut self.0[register.0 as usize]
    }
}

impl Registers {
    pub fn new() -> Self {
        Self([0; REGISTER_COUNT])
    }

    pub fn values(&self) -> &[u8; REGISTER_COUNT] {
        &self.0
    }
}
