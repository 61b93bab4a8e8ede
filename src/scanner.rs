use crate::hex_codec::parse_u16;

/// One positional argument read out of a command line.
/// `digits == 0` means nothing parseable was found; the value is then 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HexToken {
    pub value: u16,
    pub digits: usize,
}

impl HexToken {
    pub fn is_present(&self) -> bool {
        self.digits > 0
    }

    /// The parsed value, or `default` when no digit was read.
    pub fn or_omitted(&self, default: u16) -> u16 {
        if self.is_present() {
            self.value
        } else {
            default
        }
    }

    /// The parsed value, or `default` when it is zero.
    /// A typed `0000` cannot be told apart from a missing argument here.
    pub fn or_zero(&self, default: u16) -> u16 {
        if self.value == 0 {
            default
        } else {
            self.value
        }
    }
}

/*
 * TokenScanner
 * Walks space separated hex tokens of a command line, one call per expected
 * argument. Only the ASCII space is a separator.
 */
#[derive(Debug)]
pub struct TokenScanner<'a> {
    line: &'a [u8],
    cursor: usize,
}

impl<'a> TokenScanner<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Self { line, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn next_hex_token(&mut self) -> HexToken {
        while self.line.get(self.cursor) == Some(&b' ') {
            self.cursor += 1;
        }
        let (value, digits) = parse_u16(&self.line[self.cursor..]);
        self.cursor += digits;

        HexToken { value, digits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_tokens() {
        let mut scanner = TokenScanner::new(b" 0300  7F");

        assert_eq!(HexToken { value: 0x0300, digits: 4 }, scanner.next_hex_token());
        assert_eq!(5, scanner.position());
        assert_eq!(HexToken { value: 0x7f, digits: 2 }, scanner.next_hex_token());
        assert_eq!(HexToken::default(), scanner.next_hex_token());
        assert_eq!(9, scanner.position());
    }

    #[test]
    fn test_unparseable_token() {
        let mut scanner = TokenScanner::new(b" zz 10");
        let token = scanner.next_hex_token();

        assert_eq!(0, token.value);
        assert!(!token.is_present());
        assert_eq!(1, scanner.position());
        // the scanner does not skip garbage, following tokens stay unreadable
        assert!(!scanner.next_hex_token().is_present());
    }

    #[test]
    fn test_only_space_separates() {
        let mut scanner = TokenScanner::new(b"\t12");

        assert!(!scanner.next_hex_token().is_present());
        assert_eq!(0, scanner.position());
    }

    #[test]
    fn test_long_token_is_split() {
        let mut scanner = TokenScanner::new(b"123456");

        assert_eq!(0x1234, scanner.next_hex_token().value);
        assert_eq!(0x56, scanner.next_hex_token().value);
    }

    #[test]
    fn test_defaults() {
        let omitted = HexToken::default();
        let zero = HexToken { value: 0, digits: 4 };
        let some = HexToken { value: 0x10, digits: 2 };

        assert_eq!(0x0200, omitted.or_omitted(0x0200));
        assert_eq!(0x0000, zero.or_omitted(0x0200));
        assert_eq!(0x0200, zero.or_zero(0x0200));
        assert_eq!(0x0010, some.or_zero(0x0200));
    }
}
