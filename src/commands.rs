use crate::scanner::{HexToken, TokenScanner};

/*
 * A command line turned into a command letter and its positional
 * arguments. Arguments are kept as read (value + digit count) so that each
 * command applies its own defaults when it runs.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Read { address: HexToken },
    Write { address: HexToken, value: HexToken },
    Dump { address: HexToken, length: HexToken },
    Load { address: HexToken },
    Go { address: HexToken },
    Fill { address: HexToken, length: HexToken, value: HexToken },
    Disassemble { address: HexToken, count: HexToken },
    Info,
    Scan { address: HexToken, length: HexToken },
    Test { address: HexToken, length: HexToken },
    View,
    Help,
    Quit,
    Unknown(char),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim_start_matches(' ').as_bytes();
        let letter = match line.first() {
            Some(c) => c.to_ascii_uppercase(),
            None => return Command::None,
        };
        let mut args = TokenScanner::new(&line[1..]);

        match letter {
            b'R' => Command::Read {
                address: args.next_hex_token(),
            },
            b'W' => Command::Write {
                address: args.next_hex_token(),
                value: args.next_hex_token(),
            },
            b'D' => Command::Dump {
                address: args.next_hex_token(),
                length: args.next_hex_token(),
            },
            b'L' => Command::Load {
                address: args.next_hex_token(),
            },
            b'G' => Command::Go {
                address: args.next_hex_token(),
            },
            b'F' => Command::Fill {
                address: args.next_hex_token(),
                length: args.next_hex_token(),
                value: args.next_hex_token(),
            },
            b'M' => Command::Disassemble {
                address: args.next_hex_token(),
                count: args.next_hex_token(),
            },
            b'I' => Command::Info,
            b'S' => Command::Scan {
                address: args.next_hex_token(),
                length: args.next_hex_token(),
            },
            b'T' => Command::Test {
                address: args.next_hex_token(),
                length: args.next_hex_token(),
            },
            b'V' => Command::View,
            b'H' | b'?' => Command::Help,
            b'Q' => Command::Quit,
            other => Command::Unknown(other as char),
        }
    }
}
