use crate::memory::TargetMemory;
use crate::opcode::OpcodeEntry;
use std::fmt;

/// Widest instruction, in bytes.
pub const MAX_INSTRUCTION_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub address: u16,
    pub entry: OpcodeEntry,
    pub bytes: Vec<u8>,
}

impl Instruction {
    /// Operand as it reads in the listing: one byte, or a little endian word.
    pub fn operand(&self) -> Option<u16> {
        match self.bytes.as_slice() {
            [_, low] => Some(*low as u16),
            [_, low, high] => Some(u16::from_le_bytes([*low, *high])),
            _ => None,
        }
    }

    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(self.bytes.len() as u16)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}  ", self.address)?;
        for column in 0..MAX_INSTRUCTION_LEN {
            match self.bytes.get(column) {
                Some(byte) => write!(f, "{:02X} ", byte)?,
                None => write!(f, "   ")?,
            }
        }
        write!(f, "{}", self.entry.mnemonic)?;

        match self.bytes.len() {
            2 => write!(f, " ${:02X}", self.bytes[1]),
            3 => write!(f, " ${:02X}{:02X}", self.bytes[2], self.bytes[1]),
            _ => Ok(()),
        }
    }
}

/// Decode the instruction at `address`. Never fails, unknown opcodes take
/// the default length.
pub fn decode<M: TargetMemory + ?Sized>(memory: &M, address: u16) -> Instruction {
    let entry = OpcodeEntry::lookup(memory.read_byte(address));
    let bytes = (0..entry.length as u16)
        .map(|offset| memory.read_byte(address.wrapping_add(offset)))
        .collect();

    Instruction {
        address,
        entry,
        bytes,
    }
}

/*
 * Walk memory instruction after instruction, forever.
 * Use `take(n)` to bound it.
 */
pub struct InstructionIterator<'a, M: TargetMemory + ?Sized> {
    memory: &'a M,
    address: u16,
}

impl<'a, M: TargetMemory + ?Sized> InstructionIterator<'a, M> {
    pub fn new(address: u16, memory: &'a M) -> Self {
        Self { memory, address }
    }

    /// Where the next decoded instruction starts.
    pub fn address(&self) -> u16 {
        self.address
    }
}

impl<'a, M: TargetMemory + ?Sized> Iterator for InstructionIterator<'a, M> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Self::Item> {
        let instruction = decode(self.memory, self.address);
        self.address = instruction.next_address();

        Some(instruction)
    }
}

/// Decode `count` instructions from `address`.
/// Returns them with the address following the last one.
pub fn disassemble<M: TargetMemory + ?Sized>(
    memory: &M,
    address: u16,
    count: usize,
) -> (Vec<Instruction>, u16) {
    let mut iterator = InstructionIterator::new(address, memory);
    let instructions: Vec<Instruction> = iterator.by_ref().take(count).collect();

    (instructions, iterator.address())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStack;

    fn get_memory(addr: u16, program: &[u8]) -> MemoryStack {
        let mut memory = MemoryStack::new_with_ram();
        memory.load(addr, program);

        memory
    }

    #[test]
    fn test_decode_lengths() {
        let memory = get_memory(0x0200, &[0xea, 0xa9, 0x05, 0x4c, 0x00, 0x80]);
        let (instructions, next) = disassemble(&memory, 0x0200, 3);

        assert_eq!(
            vec!["NOP", "LDA#", "JMP"],
            instructions.iter().map(|i| i.entry.mnemonic).collect::<Vec<_>>()
        );
        assert_eq!(vec![1, 2, 3], instructions.iter().map(|i| i.bytes.len()).collect::<Vec<_>>());
        assert_eq!(None, instructions[0].operand());
        assert_eq!(Some(0x05), instructions[1].operand());
        assert_eq!(Some(0x8000), instructions[2].operand());
        assert_eq!(0x0206, next);
    }

    #[test]
    fn test_display() {
        let memory = get_memory(0x0200, &[0xea, 0xa9, 0x05, 0x4c, 0x00, 0x80, 0xff, 0x12]);
        let lines: Vec<String> = InstructionIterator::new(0x0200, &memory)
            .take(4)
            .map(|i| i.to_string())
            .collect();

        assert_eq!(
            vec![
                "0200  EA       NOP",
                "0201  A9 05    LDA# $05",
                "0203  4C 00 80 JMP $8000",
                "0206  FF 12    ??? $12",
            ],
            lines
        );
    }

    #[test]
    fn test_wraps_at_end_of_memory() {
        let mut memory = MemoryStack::new_with_ram();
        memory.load(0xfffe, &[0x20, 0x34]);
        memory.write_byte(0x0000, 0x12);
        let instruction = decode(&memory, 0xfffe);

        assert_eq!(vec![0x20, 0x34, 0x12], instruction.bytes);
        assert_eq!(0x0001, instruction.next_address());
    }

    #[test]
    fn test_zero_count() {
        let memory = MemoryStack::new_with_ram();
        let (instructions, next) = disassemble(&memory, 0x1234, 0);

        assert!(instructions.is_empty());
        assert_eq!(0x1234, next);
    }
}
