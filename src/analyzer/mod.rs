/*
 * Memory analysis tools.
 * All of them work through `TargetMemory` only and return a report the
 * monitor renders line by line.
 */
mod page_map;
mod scan;

pub use page_map::{page_map, sample_page, PageMap, PageUsage};
pub use ram_test::{test_ram, Mismatch, RamTestReport};
pub use scan::{scan_free_space, FreeRun, ScanReport};

/// A byte holding one of these values is considered unused.
pub fn is_free_byte(value: u8) -> bool {
    value == 0x00 || value == 0xFF
}
