/*
 * Operator input.
 *
 * The input side of the monitor is a two states machine:
 *
 *   Command --(L command)--> Load
 *   Load    --('.')--------> Command
 *
 * In Command state, characters are collected into a line by the LineEditor
 * and the line is dispatched once Enter is hit. In Load state, every
 * character is handed to the Loader as soon as it arrives: pairs of hex
 * digits become bytes written to the target.
 */
use crate::hex_codec::hex_digit_value;
use crate::memory::TargetMemory;
use crate::transport::{Transport, TransportError};

pub const DEFAULT_LINE_CAPACITY: usize = 64;
pub const CRLF: &str = "\r\n";

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;
const ESCAPE: u8 = 0x1B;
const ERASE_SEQUENCE: &str = "\x08 \x08";

fn is_enter(c: u8) -> bool {
    c == b'\r' || c == b'\n'
}

/// One line of operator input, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine(String);

impl CommandLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for CommandLine {
    fn from(line: &str) -> Self {
        Self(line.to_owned())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Submitted(CommandLine),
    /// Escape was hit, the line is thrown away.
    Cancelled,
}

#[derive(Debug)]
pub struct LineEditor {
    buffer: Vec<u8>,
    capacity: usize,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_CAPACITY)
    }
}

impl LineEditor {
    /// `capacity` counts the terminator the target firmware keeps, so at
    /// most `capacity - 1` characters are accepted.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn is_full(&self) -> bool {
        self.buffer.len() + 1 >= self.capacity
    }

    pub fn read_line<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<LineOutcome, TransportError> {
        self.buffer.clear();

        loop {
            let c = transport.read_char()?;

            match c {
                c if is_enter(c) => {
                    transport.write_str(CRLF)?;
                    let line = String::from_utf8_lossy(&self.buffer).into_owned();

                    return Ok(LineOutcome::Submitted(CommandLine(line)));
                }
                BACKSPACE | DELETE => {
                    if self.buffer.pop().is_some() {
                        transport.write_str(ERASE_SEQUENCE)?;
                    }
                }
                ESCAPE => {
                    self.buffer.clear();
                    transport.write_str(" [ESC]")?;
                    transport.write_str(CRLF)?;

                    return Ok(LineOutcome::Cancelled);
                }
                0x20..=0x7E if !self.is_full() => {
                    self.buffer.push(c);
                    transport.write_char(c)?;
                }
                _ => {}
            }
        }
    }
}

/// What the loader made of one input character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    /// accepted, to be echoed
    Echo(u8),
    /// soft line break, the load prompt is shown again
    NewLine,
    Ignored,
    /// '.', load mode is over
    Finished,
}

/// Byte loader state: where the next byte goes and the half typed byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
    address: u16,
    high_nibble: Option<u8>,
    loaded: u16,
}

impl Loader {
    pub fn new(address: u16) -> Self {
        Self {
            address,
            high_nibble: None,
            loaded: 0,
        }
    }

    /// Next write address.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Number of bytes written so far.
    pub fn loaded(&self) -> u16 {
        self.loaded
    }

    pub fn feed<M: TargetMemory + ?Sized>(&mut self, c: u8, memory: &mut M) -> LoadEvent {
        if c == b'.' {
            return LoadEvent::Finished;
        }
        if is_enter(c) {
            return LoadEvent::NewLine;
        }
        if c == b' ' {
            return LoadEvent::Echo(c);
        }

        match (hex_digit_value(c), self.high_nibble.take()) {
            (Some(low), Some(high)) => {
                memory.write_byte(self.address, high << 4 | low);
                self.address = self.address.wrapping_add(1);
                self.loaded = self.loaded.wrapping_add(1);
                LoadEvent::Echo(c)
            }
            (Some(high), None) => {
                self.high_nibble = Some(high);
                LoadEvent::Echo(c)
            }
            (None, pending) => {
                self.high_nibble = pending;
                LoadEvent::Ignored
            }
        }
    }
}

/// Current state of the input side of the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Command,
    Load(Loader),
}
