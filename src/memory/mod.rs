mod error;
mod memory_stack;
mod ram;
mod rom;

pub use error::MemoryError;
pub use memory_stack::MemoryStack;
pub use ram::RAM;
pub use rom::ROM;

/// Size of the 6502 address space.
pub const ADDRESS_SPACE: usize = 0x1_0000;

/// Value seen when reading an address nothing answers to.
pub const OPEN_BUS: u8 = 0xFF;

/*
 * TargetMemory
 * Raw access to the target's flat 16 bits address space. This is all the
 * monitor ever needs from memory: one byte at a time, no error reporting.
 * Whatever happens on a bad address is the implementation's business.
 */
pub trait TargetMemory {
    fn read_byte(&self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, value: u8);
}

/*
 * AddressableIO
 * this trait defines the interface for the memory subsystems a host side
 * target is built from. Addresses are relative to the subsystem start.
 */
pub trait AddressableIO {
    fn read(&self, addr: usize, len: usize) -> Result<Vec<u8>, MemoryError>;
    fn write(&mut self, location: usize, data: &[u8]) -> Result<(), MemoryError>;
    fn get_size(&self) -> usize;
}

impl<M: TargetMemory + ?Sized> TargetMemory for &mut M {
    fn read_byte(&self, addr: u16) -> u8 {
        (**self).read_byte(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        (**self).write_byte(addr, value)
    }
}
