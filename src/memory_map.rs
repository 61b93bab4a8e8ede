/*
 * Memory map of the target board.
 * These are fixed constants of the hardware, the monitor never probes them.
 */
use range_map::Range;

pub const ZERO_PAGE_START: u16 = 0x0002;
pub const ZERO_PAGE_END: u16 = 0x00FF;
pub const RAM_START: u16 = 0x0100;
pub const RAM_END: u16 = 0x3DFF;
pub const STACK_START: u16 = 0x3E00;
pub const STACK_END: u16 = 0x3FFF;
pub const ROM_START: u16 = 0x8000;
pub const ROM_END: u16 = 0x9FFF;
pub const IO_START: u16 = 0xC000;
pub const IO_END: u16 = 0xC0FF;

/// First byte of RAM free for user programs.
pub const USER_RAM_START: u16 = 0x0200;
/// Last byte of RAM free for user programs.
pub const USER_RAM_END: u16 = RAM_END;

/// Where the monitor's current address points at startup.
pub const DEFAULT_LAST_ADDRESS: u16 = USER_RAM_START;

pub const SCAN_DEFAULT_LENGTH: u16 = 0x3BFF;
pub const RAM_TEST_DEFAULT_LENGTH: u16 = 0x0100;

/// Pages shown by the page usage map.
pub const FIRST_MAPPED_PAGE: u8 = 0x01;
pub const LAST_MAPPED_PAGE: u8 = 0x3D;

#[derive(Debug, Clone)]
pub struct MemoryRegion {
    pub name: &'static str,
    pub range: Range<u16>,
}

impl MemoryRegion {
    fn new(name: &'static str, start: u16, end: u16) -> Self {
        Self {
            name,
            range: Range::new(start, end),
        }
    }

    pub fn size(&self) -> usize {
        (self.range.end - self.range.start) as usize + 1
    }

    pub fn contains(&self, addr: u16) -> bool {
        self.range.contains(addr)
    }
}

pub fn memory_regions() -> Vec<MemoryRegion> {
    vec![
        MemoryRegion::new("Zero Page", ZERO_PAGE_START, ZERO_PAGE_END),
        MemoryRegion::new("RAM", RAM_START, RAM_END),
        MemoryRegion::new("Stack", STACK_START, STACK_END),
        MemoryRegion::new("ROM", ROM_START, ROM_END),
        MemoryRegion::new("I/O", IO_START, IO_END),
    ]
}

pub fn user_ram() -> MemoryRegion {
    MemoryRegion::new("User RAM", USER_RAM_START, USER_RAM_END)
}

/// The `I` command report.
pub fn info_report() -> Vec<String> {
    let mut lines = vec![String::new(), "=== MEMORY MAP ===".to_owned(), String::new()];

    for region in memory_regions() {
        lines.push(format!(
            "{:<11} ${:04X}-${:04X} ({} bytes)",
            format!("{}:", region.name),
            region.range.start,
            region.range.end,
            region.size()
        ));
    }
    let user = user_ram();
    lines.push(String::new());
    lines.push("Free RAM for programs:".to_owned());
    lines.push(format!(
        "  ${:04X}-${:04X} ({} bytes)",
        user.range.start,
        user.range.end,
        user.size()
    ));

    lines
}
