/*
 * Opcode table.
 * This is deliberately partial: only the common 6502 instructions have a
 * mnemonic, everything else prints as "???". The length classifier works on
 * opcode bit patterns so that any byte decodes to some length between 1 and 3.
 */
use std::fmt;

pub const UNKNOWN_MNEMONIC: &str = "???";
pub const DEFAULT_LENGTH: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub length: u8,
}

impl OpcodeEntry {
    pub fn lookup(opcode: u8) -> Self {
        Self {
            opcode,
            mnemonic: mnemonic(opcode).unwrap_or(UNKNOWN_MNEMONIC),
            length: instruction_length(opcode),
        }
    }

    pub fn is_known(&self) -> bool {
        self.mnemonic != UNKNOWN_MNEMONIC
    }
}

impl fmt::Display for OpcodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.mnemonic, self.length)
    }
}

pub fn mnemonic(opcode: u8) -> Option<&'static str> {
    let mnemonic = match opcode {
        0x00 => "BRK",
        0x20 => "JSR",
        0x40 => "RTI",
        0x60 => "RTS",
        0x4C => "JMP",
        0x6C => "JMP()",
        0xA9 => "LDA#",
        0xA5 => "LDAzp",
        0xAD => "LDAab",
        0xA2 => "LDX#",
        0xA0 => "LDY#",
        0x85 => "STAzp",
        0x8D => "STAab",
        0x86 => "STXzp",
        0x84 => "STYzp",
        0xE8 => "INX",
        0xC8 => "INY",
        0xCA => "DEX",
        0x88 => "DEY",
        0x18 => "CLC",
        0x38 => "SEC",
        0xD8 => "CLD",
        0xF8 => "SED",
        0x58 => "CLI",
        0x78 => "SEI",
        0xEA => "NOP",
        0xAA => "TAX",
        0xA8 => "TAY",
        0x8A => "TXA",
        0x98 => "TYA",
        0x9A => "TXS",
        0xBA => "TSX",
        0x48 => "PHA",
        0x68 => "PLA",
        0x08 => "PHP",
        0x28 => "PLP",
        0x69 => "ADC#",
        0xE9 => "SBC#",
        0xC9 => "CMP#",
        0xE0 => "CPX#",
        0xC0 => "CPY#",
        0x29 => "AND#",
        0x09 => "ORA#",
        0x49 => "EOR#",
        0xD0 => "BNE",
        0xF0 => "BEQ",
        0x10 => "BPL",
        0x30 => "BMI",
        0x90 => "BCC",
        0xB0 => "BCS",
        0x50 => "BVC",
        0x70 => "BVS",
        _ => return None,
    };

    Some(mnemonic)
}

/// One rule of the length classifier.
#[derive(Debug)]
enum LengthRule {
    /// the opcode is one of the listed bytes
    OneOf(&'static [u8]),
    /// `opcode & mask == value`
    Masked { mask: u8, value: u8 },
}

impl LengthRule {
    fn matches(&self, opcode: u8) -> bool {
        match self {
            Self::OneOf(opcodes) => opcodes.contains(&opcode),
            Self::Masked { mask, value } => opcode & mask == *value,
        }
    }
}

const fn low_nibble(value: u8) -> LengthRule {
    LengthRule::Masked { mask: 0x0F, value }
}

/// Rules are evaluated in order, the first match gives the length.
const LENGTH_RULES: &[(LengthRule, u8)] = &[
    // implied & accumulator
    (
        LengthRule::OneOf(&[
            0x00, 0x40, 0x60, 0xE8, 0xC8, 0xCA, 0x88, 0x18, 0x38, 0xD8, 0xF8, 0x58, 0x78, 0xEA,
            0xAA, 0xA8, 0x8A, 0x98, 0x9A, 0xBA, 0x48, 0x68, 0x08, 0x28,
        ]),
        1,
    ),
    // immediate, zero page
    (low_nibble(0x09), 2),
    (low_nibble(0x05), 2),
    (low_nibble(0x06), 2),
    // relative branches
    (LengthRule::Masked { mask: 0x1F, value: 0x10 }, 2),
    // LDX# LDY# CPX# CPY#
    (LengthRule::OneOf(&[0xA2, 0xA0, 0xE0, 0xC0]), 2),
    // JSR, JMP absolute & indirect
    (LengthRule::OneOf(&[0x20, 0x4C, 0x6C]), 3),
    // absolute
    (low_nibble(0x0D), 3),
    (low_nibble(0x0E), 3),
];

pub fn instruction_length(opcode: u8) -> u8 {
    LENGTH_RULES
        .iter()
        .find(|(rule, _)| rule.matches(opcode))
        .map(|(_, length)| *length)
        .unwrap_or(DEFAULT_LENGTH)
}
