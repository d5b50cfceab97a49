use crate::opcode::Opcode;

/// Maps every instruction byte to the table opcode it names, if any.
///
/// Built once when the machine is constructed and never changed afterwards.
pub struct DispatchTable {
    entries: [Option<Opcode>; 256],
}

impl DispatchTable {
    pub fn new() -> Self {
        let mut entries = [None; 256];
        for opcode in Opcode::ALL {
            entries[opcode.byte() as usize] = Some(opcode);
        }
        Self { entries }
    }

    pub fn lookup(&self, byte: u8) -> Option<Opcode> {
        self.entries[byte as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::DispatchTable;
    use crate::opcode::Opcode;

    #[test]
    fn test_lookup() {
        let table = DispatchTable::new();
        for opcode in Opcode::ALL {
            assert_eq!(table.lookup(opcode.byte()), Some(opcode));
        }
        assert_eq!(table.lookup(0b0000_0000), None);
        assert_eq!(table.lookup(0b1111_1111), None);
        assert_eq!(table.lookup(0b1010_0000), None);
    }

    #[test]
    fn test_entry_count() {
        let table = DispatchTable::new();
        let count = (0..=u8::MAX).filter(|&b| table.lookup(b).is_some()).count();
        assert_eq!(count, Opcode::ALL.len());
    }
}
