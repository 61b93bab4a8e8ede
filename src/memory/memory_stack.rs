use super::*;
use log::{debug, trace};
use range_map::Range;
use std::fmt;

struct Subsystem {
    subsystem: Box<dyn AddressableIO>,
    address_range: Range<usize>,
    name: String,
}

impl Subsystem {
    pub fn contains(&self, addr: usize) -> bool {
        self.address_range.contains(addr)
    }

    fn offset(&self, addr: usize) -> usize {
        addr - self.address_range.start
    }
}

impl fmt::Debug for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Subsystem {:<12}, address range=#0x{:04X} → #0x{:04X}, size = {} bytes",
            self.name,
            self.address_range.start,
            self.address_range.end,
            self.subsystem.get_size()
        )
    }
}

/*
 * MemoryStack
 * A simulated target assembled from memory subsystems mapped at fixed
 * addresses. When subsystems overlap, the last one added answers.
 * Addresses nobody answers to read as open bus, writes to them are dropped.
 */
#[derive(Debug, Default)]
pub struct MemoryStack {
    stack: Vec<Subsystem>,
}

impl MemoryStack {
    /// The whole address space backed by RAM.
    pub fn new_with_ram() -> Self {
        let mut memory_stack = Self::default();
        memory_stack.stack.push(Subsystem {
            name: "RAM".to_owned(),
            subsystem: Box::new(RAM::new(ADDRESS_SPACE)),
            address_range: Range::new(0, ADDRESS_SPACE - 1),
        });

        memory_stack
    }

    pub fn add_subsystem(
        &mut self,
        name: &str,
        start_address: usize,
        memory: impl AddressableIO + 'static,
    ) -> Result<(), MemoryError> {
        let size = memory.get_size();
        if size == 0 {
            return Err(MemoryError::Other(start_address, "empty memory subsystem"));
        }
        if start_address + size > ADDRESS_SPACE {
            return Err(MemoryError::OutOfAddressSpace {
                name: name.to_owned(),
                start: start_address,
            });
        }
        let sub = Subsystem {
            name: name.to_owned(),
            subsystem: Box::new(memory),
            address_range: Range::new(start_address, start_address + size - 1),
        };
        debug!("mapping {:?}", sub);
        self.stack.push(sub);

        Ok(())
    }

    pub fn get_subsystems_info(&self) -> Vec<String> {
        self.stack
            .iter()
            .enumerate()
            .map(|(index, sub)| format!("#{}: {:?}", index, sub))
            .collect()
    }

    /// Copy an image into the target byte per byte, as the monitor's load
    /// mode would. Returns the number of bytes sent.
    pub fn load(&mut self, addr: u16, data: &[u8]) -> usize {
        let mut location = addr;
        for byte in data {
            self.write_byte(location, *byte);
            location = location.wrapping_add(1);
        }

        data.len()
    }

    fn find(&self, addr: usize) -> Option<&Subsystem> {
        self.stack.iter().rev().find(|sub| sub.contains(addr))
    }

    fn find_mut(&mut self, addr: usize) -> Option<&mut Subsystem> {
        self.stack.iter_mut().rev().find(|sub| sub.contains(addr))
    }
}

impl TargetMemory for MemoryStack {
    fn read_byte(&self, addr: u16) -> u8 {
        let addr = addr as usize;
        let value = match self.find(addr) {
            Some(sub) => match sub.subsystem.read(sub.offset(addr), 1) {
                Ok(bytes) => bytes.first().copied().unwrap_or(OPEN_BUS),
                Err(e) => {
                    debug!("read in {} failed: {}", sub.name, e);
                    OPEN_BUS
                }
            },
            None => OPEN_BUS,
        };
        trace!("read  #0x{:04X} → 0x{:02X}", addr, value);

        value
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        let addr = addr as usize;
        trace!("write #0x{:04X} ← 0x{:02X}", addr, value);
        match self.find_mut(addr) {
            Some(sub) => {
                let offset = sub.offset(addr);
                if let Err(e) = sub.subsystem.write(offset, &[value]) {
                    debug!("write in {} dropped: {}", sub.name, e);
                }
            }
            None => debug!("write at unmapped address #0x{:04X} dropped", addr),
        }
    }
}
