use super::*;

pub struct ROM {
    rom: Vec<u8>,
}

impl ROM {
    pub fn new(data: Vec<u8>) -> ROM {
        ROM { rom: data }
    }

    /// An erased ROM of the given size.
    pub fn blank(size: usize) -> ROM {
        ROM::new(vec![OPEN_BUS; size])
    }

    /// Build a ROM of exactly `size` bytes out of an image, padding with
    /// erased bytes. Images larger than the ROM are refused.
    pub fn from_image(image: &[u8], size: usize) -> Result<ROM, MemoryError> {
        if image.len() > size {
            return Err(MemoryError::WriteOverflow(image.len(), 0));
        }
        let mut data = image.to_vec();
        data.resize(size, OPEN_BUS);

        Ok(ROM::new(data))
    }
}

impl AddressableIO for ROM {
    fn read(&self, addr: usize, len: usize) -> Result<Vec<u8>, MemoryError> {
        if self.rom.len() >= addr + len {
            Ok(self.rom[addr..addr + len].to_vec())
        } else {
            Err(MemoryError::ReadOverflow(len, addr))
        }
    }

    fn write(&mut self, location: usize, _data: &[u8]) -> Result<(), MemoryError> {
        Err(MemoryError::Other(
            location,
            "trying to write in a read-only memory",
        ))
    }

    fn get_size(&self) -> usize {
        self.rom.len()
    }
}
