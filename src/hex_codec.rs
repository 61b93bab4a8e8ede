/*
 * Hexadecimal text <-> integer conversions.
 * Everything the operator types and everything the monitor prints goes
 * through here. Parsing is lenient: it stops at the first character that is
 * not a hex digit and never reports an error.
 */

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Value of one ASCII hex digit, `None` for anything else.
pub fn hex_digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

pub fn is_hex_digit(c: u8) -> bool {
    hex_digit_value(c).is_some()
}

/// Read at most `max_digits` leading hex digits.
/// Returns the accumulated value and the number of digits consumed.
fn parse_digits(text: &[u8], max_digits: usize) -> (u16, usize) {
    let mut value: u16 = 0;
    let mut digits = 0;

    for nibble in text.iter().take(max_digits).map_while(|c| hex_digit_value(*c)) {
        value = value << 4 | nibble as u16;
        digits += 1;
    }

    (value, digits)
}

/// Parse up to 2 leading hex digits.
pub fn parse_u8(text: &[u8]) -> (u8, usize) {
    let (value, digits) = parse_digits(text, 2);

    (value as u8, digits)
}

/// Parse up to 4 leading hex digits.
pub fn parse_u16(text: &[u8]) -> (u16, usize) {
    parse_digits(text, 4)
}

pub fn format_hex8(value: u8) -> String {
    let mut output = String::with_capacity(2);
    output.push(HEX_CHARS[(value >> 4) as usize] as char);
    output.push(HEX_CHARS[(value & 0x0F) as usize] as char);

    output
}

pub fn format_hex16(value: u16) -> String {
    let [high, low] = value.to_be_bytes();

    format!("{}{}", format_hex8(high), format_hex8(low))
}
