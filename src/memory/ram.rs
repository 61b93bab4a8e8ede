use super::*;

pub struct RAM {
    ram: Vec<u8>,
}

impl RAM {
    pub fn new(size: usize) -> Self {
        Self {
            ram: vec![0x00; size],
        }
    }
}

impl AddressableIO for RAM {
    fn read(&self, addr: usize, len: usize) -> Result<Vec<u8>, MemoryError> {
        if self.ram.len() >= addr + len {
            Ok(self.ram[addr..addr + len].to_vec())
        } else {
            Err(MemoryError::ReadOverflow(len, addr))
        }
    }

    fn write(&mut self, location: usize, data: &[u8]) -> Result<(), MemoryError> {
        if location + data.len() > self.ram.len() {
            Err(MemoryError::WriteOverflow(data.len(), location))
        } else {
            self.ram[location..location + data.len()].copy_from_slice(data);

            Ok(())
        }
    }

    fn get_size(&self) -> usize {
        self.ram.len()
    }
}
