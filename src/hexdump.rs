use crate::memory::TargetMemory;

pub const BYTES_PER_ROW: usize = 16;

fn printable(byte: u8) -> char {
    if (0x20..0x7F).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

/// Format `len` bytes starting at `addr` as rows of hex and ASCII.
/// Short rows are padded so the ASCII gutter stays aligned.
pub fn dump_lines<M: TargetMemory + ?Sized>(memory: &M, addr: u16, len: u16) -> Vec<String> {
    let mut lines = Vec::new();

    for row_start in (0..len as usize).step_by(BYTES_PER_ROW) {
        let row_addr = addr.wrapping_add(row_start as u16);
        let row_len = BYTES_PER_ROW.min(len as usize - row_start);
        let bytes: Vec<u8> = (0..row_len)
            .map(|offset| memory.read_byte(row_addr.wrapping_add(offset as u16)))
            .collect();

        let mut line = format!("{:04X}: ", row_addr);
        for byte in &bytes {
            line.push_str(&format!("{:02X} ", byte));
        }
        for _ in row_len..BYTES_PER_ROW {
            line.push_str("   ");
        }
        line.push('|');
        line.extend(bytes.iter().map(|byte| printable(*byte)));
        line.push('|');

        lines.push(line);
    }

    lines
}
