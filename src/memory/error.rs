use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone, Hash)]
pub enum MemoryError {
    #[error("Could not READ {0} bytes at address 0x{1:04X}.")]
    ReadOverflow(usize, usize), // read len, address
    #[error("Could not WRITE {0} bytes at address 0x{1:04X}.")]
    WriteOverflow(usize, usize), // write len, address
    #[error("Memory error @{0:04X} with message: {1}")]
    Other(usize, &'static str), // address, error message
    #[error("Subsystem '{name}' at 0x{start:04X} overlaps the end of the address space.")]
    OutOfAddressSpace { name: String, start: usize },
}
