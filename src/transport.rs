/*
 * Character transport between the operator and the monitor.
 * On the real target this is a UART, on the host it is a terminal, a file
 * or an in-memory script.
 */
use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("input channel closed")]
    Closed,
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Transport {
    /// Block until one character is available.
    fn read_char(&mut self) -> Result<u8, TransportError>;
    fn write_char(&mut self, c: u8) -> Result<(), TransportError>;

    fn write_str(&mut self, s: &str) -> Result<(), TransportError> {
        for c in s.bytes() {
            self.write_char(c)?;
        }

        Ok(())
    }
}

/// Transport over any reader/writer pair, typically stdin and stdout.
#[derive(Debug)]
pub struct StreamTransport<R, W>
where
    R: Read,
    W: Write,
{
    input: R,
    output: W,
}

impl<R, W> StreamTransport<R, W>
where
    R: Read,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    pub fn flush(&mut self) -> Result<(), TransportError> {
        self.output.flush()?;

        Ok(())
    }
}

impl<R, W> Transport for StreamTransport<R, W>
where
    R: Read,
    W: Write,
{
    fn read_char(&mut self) -> Result<u8, TransportError> {
        // whatever was echoed so far must reach the operator before blocking
        self.output.flush()?;
        let mut buffer = [0u8; 1];

        loop {
            match self.input.read(&mut buffer) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(_) => return Ok(buffer[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn write_char(&mut self, c: u8) -> Result<(), TransportError> {
        self.output.write_all(&[c])?;

        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<(), TransportError> {
        self.output.write_all(s.as_bytes())?;

        Ok(())
    }
}

/// In-memory transport: input is queued up front, output is captured.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl ScriptedTransport {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.bytes().collect(),
            output: Vec::new(),
        }
    }

    pub fn push_input(&mut self, input: &str) {
        self.input.extend(input.bytes());
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Captured output split on CRLF, the captured buffer is emptied.
    pub fn take_lines(&mut self) -> Vec<String> {
        let output = self.output();
        self.output.clear();

        output.split("\r\n").map(|l| l.to_owned()).collect()
    }
}

impl Transport for ScriptedTransport {
    fn read_char(&mut self) -> Result<u8, TransportError> {
        self.input.pop_front().ok_or(TransportError::Closed)
    }

    fn write_char(&mut self, c: u8) -> Result<(), TransportError> {
        self.output.push(c);

        Ok(())
    }
}
