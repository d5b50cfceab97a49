use std::fmt::Display;

use crate::error::{Fault, LoadError};
use crate::MEM_SIZE;

pub struct Memory {
    pub(crate) data: [u8; MEM_SIZE],
}

impl Memory {
    /// Create a zeroed instance of the Memory struct
    pub fn new() -> Self {
        Self {
            data: [0; MEM_SIZE],
        }
    }

    pub fn read(&self, addr: usize) -> Result<u8, Fault> {
        self.data.get(addr).copied().ok_or(Fault::OutOfBounds(addr))
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        let cell = self.data.get_mut(addr).ok_or(Fault::OutOfBounds(addr))?;
        *cell = value;
        Ok(())
    }

    /// Copy `image` into memory starting at address 0 and return the number of bytes written
    pub fn load(&mut self, image: &[u8]) -> Result<usize, LoadError> {
        if image.len() > self.data.len() {
            return Err(LoadError::TooLarge {
                len: image.len(),
                capacity: self.data.len(),
            });
        }

        self.data[..image.len()].copy_from_slice(image);
        Ok(image.len())
    }
}

impl Display for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const BYTES_PER_LINE: usize = 16;
        for (line, chunk) in self.data.chunks(BYTES_PER_LINE).enumerate() {
            write!(f, "{:02X}: ", line * BYTES_PER_LINE)?;
            for byte in chunk {
                write!(f, "{:02X} ", byte)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Memory;
    use crate::error::{Fault, LoadError};
    use crate::MEM_SIZE;

    #[test]
    fn test_read_write() {
        let mut memory = Memory::new();
        memory.write(0xFF, 0x2A).unwrap();
        assert_eq!(memory.read(0xFF).unwrap(), 0x2A);
        assert_eq!(memory.read(0x00).unwrap(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut memory = Memory::new();
        assert!(matches!(memory.read(MEM_SIZE), Err(Fault::OutOfBounds(0x100))));
        assert!(matches!(
            memory.write(MEM_SIZE + 1, 1),
            Err(Fault::OutOfBounds(0x101))
        ));
    }

    #[test]
    fn test_load() {
        let mut memory = Memory::new();
        assert_eq!(memory.load(&[1, 2, 3]).unwrap(), 3);
        assert_eq!(memory.data[0..4], [1, 2, 3, 0]);

        let image = vec![0; MEM_SIZE + 1];
        assert!(matches!(
            memory.load(&image),
            Err(LoadError::TooLarge { len: 257, capacity: 256 })
        ));
    }

    #[test]
    fn test_dump() {
        let mut memory = Memory::new();
        memory.write(0x11, 0xAB).unwrap();
        let dump = memory.to_string();
        assert_eq!(dump.lines().count(), MEM_SIZE / 16);
        assert!(dump.lines().nth(1).unwrap().starts_with("10: 00 AB "));
    }
}
