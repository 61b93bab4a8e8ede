use crate::analyzer::{page_map, scan_free_space, test_ram};
use crate::commands::Command;
use crate::config::MonitorConfig;
use crate::disassembler::disassemble;
use crate::executor::Executor;
use crate::hexdump::dump_lines;
use crate::line_editor::{InputMode, LineEditor, LineOutcome, LoadEvent, Loader, CRLF};
use crate::memory::TargetMemory;
use crate::memory_map::*;
use crate::scanner::HexToken;
use crate::transport::{Transport, TransportError};
use log::debug;

pub const DEFAULT_DUMP_LENGTH: u16 = 0x40;
pub const DEFAULT_DISASSEMBLY_COUNT: u16 = 16;

const HELP: &[&str] = &[
    "",
    "=== MONITOR 6502 ===",
    "All values in HEX (addr=4 digits)",
    "--- BASICS ---",
    "R addr      | Read byte",
    "W addr val  | Write byte",
    "D addr len  | Dump memory",
    "L addr      | Load hex (end=.)",
    "G addr      | Execute code",
    "F addr ln v | Fill memory",
    "M addr [n]  | Disassemble",
    "--- MEMORY ---",
    "I           | Memory map info",
    "S addr len  | Scan free memory",
    "T addr len  | Test RAM",
    "V           | RAM view",
    "--- OTHER ---",
    "H/?         | Help",
    "Q           | Quit",
    "Ex: D 8000 40  F 0200 100 EA",
    "Free RAM: $0200-$3DFF",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Quit,
}

/// State kept from one command to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    last_address: u16,
}

impl Session {
    pub fn new(initial_address: u16) -> Self {
        Self {
            last_address: initial_address,
        }
    }

    /// Address commands continue from when theirs is omitted.
    pub fn last_address(&self) -> u16 {
        self.last_address
    }

    pub fn set_last_address(&mut self, address: u16) {
        self.last_address = address;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_LAST_ADDRESS)
    }
}

/*
 * Monitor
 * One operator session: owns the transport, the target memory, the way to
 * hand control to target code, and the session state. Every command runs to
 * completion before the next character is read; the only errors leaving
 * the monitor come from the transport.
 */
pub struct Monitor<T, M, E>
where
    T: Transport,
    M: TargetMemory,
    E: Executor,
{
    config: MonitorConfig,
    transport: T,
    memory: M,
    executor: E,
    session: Session,
    editor: LineEditor,
    mode: InputMode,
}

impl<T, M, E> Monitor<T, M, E>
where
    T: Transport,
    M: TargetMemory,
    E: Executor,
{
    pub fn new(config: MonitorConfig, transport: T, memory: M, executor: E) -> Self {
        Self {
            session: Session::new(config.initial_address),
            editor: LineEditor::new(config.line_capacity),
            mode: InputMode::Command,
            config,
            transport,
            memory,
            executor,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_parts(self) -> (T, M, E) {
        (self.transport, self.memory, self.executor)
    }

    /// Run the session until the operator quits.
    pub fn run(&mut self) -> Result<(), TransportError> {
        if self.config.banner {
            self.banner()?;
        }
        while self.step()? == Status::Continue {}

        Ok(())
    }

    /// One turn of the input state machine: a whole command line in command
    /// mode, a single character in load mode.
    pub fn step(&mut self) -> Result<Status, TransportError> {
        if let InputMode::Load(loader) = &mut self.mode {
            let c = self.transport.read_char()?;

            match loader.feed(c, &mut self.memory) {
                LoadEvent::Echo(c) => self.transport.write_char(c)?,
                LoadEvent::NewLine => {
                    self.transport.write_str(CRLF)?;
                    self.transport.write_char(b':')?;
                }
                LoadEvent::Ignored => {}
                LoadEvent::Finished => {
                    if let InputMode::Load(loader) = std::mem::take(&mut self.mode) {
                        self.finish_load(loader)?;
                    }
                }
            }

            return Ok(Status::Continue);
        }

        self.transport.write_str(CRLF)?;
        self.transport.write_char(b'>')?;

        match self.editor.read_line(&mut self.transport)? {
            LineOutcome::Submitted(line) => self.dispatch(line.as_str()),
            LineOutcome::Cancelled => Ok(Status::Continue),
        }
    }

    pub fn dispatch(&mut self, line: &str) -> Result<Status, TransportError> {
        let command = Command::parse(line);
        debug!("dispatching {:?}", command);

        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<Status, TransportError> {
        match command {
            Command::None => {}
            Command::Read { address } => self.read(address)?,
            Command::Write { address, value } => self.write(address, value)?,
            Command::Dump { address, length } => self.dump(address, length)?,
            Command::Load { address } => self.enter_load_mode(address)?,
            Command::Go { address } => self.go(address)?,
            Command::Fill {
                address,
                length,
                value,
            } => self.fill(address, length, value)?,
            Command::Disassemble { address, count } => self.disassemble(address, count)?,
            Command::Info => self.print_lines(info_report())?,
            Command::Scan { address, length } => self.scan(address, length)?,
            Command::Test { address, length } => self.test(address, length)?,
            Command::View => {
                let map = page_map(&self.memory, FIRST_MAPPED_PAGE, LAST_MAPPED_PAGE);
                self.print_lines(map.render())?
            }
            Command::Help => {
                for line in HELP {
                    self.print_line(line)?;
                }
            }
            Command::Quit => {
                self.print_line("Leaving monitor...")?;
                return Ok(Status::Quit);
            }
            Command::Unknown(letter) => {
                debug!("unknown command letter {:?}", letter);
                self.print_error("Unknown command. H=help")?
            }
        }

        Ok(Status::Continue)
    }

    fn banner(&mut self) -> Result<(), TransportError> {
        let frame = "=".repeat(32);
        self.transport.write_str(CRLF)?;
        self.print_line(&frame)?;
        self.print_line(&format!("  MONITOR 6502 v{}", crate::VERSION))?;
        let target_line = format!("  {}", self.config.target_name);
        self.print_line(&target_line)?;
        self.print_line(&frame)?;
        self.transport.write_str("Type H for help")
    }

    fn print_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.transport.write_str(line)?;
        self.transport.write_str(CRLF)
    }

    fn print_lines(&mut self, lines: Vec<String>) -> Result<(), TransportError> {
        for line in lines {
            self.print_line(&line)?;
        }

        Ok(())
    }

    fn print_error(&mut self, message: &str) -> Result<(), TransportError> {
        self.print_line(&format!("ERR: {}", message))
    }

    fn read(&mut self, address: HexToken) -> Result<(), TransportError> {
        let address = address.or_omitted(self.session.last_address());
        let value = self.memory.read_byte(address);
        self.print_line(&format!("${:04X} = ${:02X}", address, value))?;
        self.session.set_last_address(address.wrapping_add(1));

        Ok(())
    }

    fn write(&mut self, address: HexToken, value: HexToken) -> Result<(), TransportError> {
        let (address, value) = (address.value, value.value as u8);
        self.memory.write_byte(address, value);
        self.print_line(&format!("${:04X} <- ${:02X}", address, value))?;
        self.session.set_last_address(address.wrapping_add(1));

        Ok(())
    }

    fn dump(&mut self, address: HexToken, length: HexToken) -> Result<(), TransportError> {
        let address = address.value;
        let length = length.or_zero(DEFAULT_DUMP_LENGTH);
        let lines = dump_lines(&self.memory, address, length);
        self.print_lines(lines)?;
        self.session.set_last_address(address.wrapping_add(length));

        Ok(())
    }

    fn enter_load_mode(&mut self, address: HexToken) -> Result<(), TransportError> {
        let address = address.or_zero(self.session.last_address());
        debug!("entering load mode at #0x{:04X}", address);
        self.print_line(&format!("Load mode at ${:04X} (end with '.')", address))?;
        self.transport.write_char(b':')?;
        self.mode = InputMode::Load(Loader::new(address));

        Ok(())
    }

    fn finish_load(&mut self, loader: Loader) -> Result<(), TransportError> {
        debug!(
            "leaving load mode, {} bytes loaded, next address #0x{:04X}",
            loader.loaded(),
            loader.address()
        );
        self.transport.write_str(CRLF)?;
        self.print_line(&format!("Loaded {:04X} bytes", loader.loaded()))?;
        self.session.set_last_address(loader.address());

        Ok(())
    }

    fn go(&mut self, address: HexToken) -> Result<(), TransportError> {
        let address = address.value;
        self.print_line(&format!("Executing at ${:04X}...", address))?;
        self.executor.call(address);
        if !self.executor.has_cpu() {
            self.print_line("(no CPU attached)")?;
        }
        self.transport.write_str(CRLF)?;
        self.print_line(&format!("Returned from ${:04X}", address))
    }

    fn fill(
        &mut self,
        address: HexToken,
        length: HexToken,
        value: HexToken,
    ) -> Result<(), TransportError> {
        let (address, length, value) = (address.value, length.value, value.value as u8);
        if length == 0 {
            return self.print_line("Nothing to fill");
        }
        for offset in 0..length {
            self.memory.write_byte(address.wrapping_add(offset), value);
        }
        let last = address.wrapping_add(length - 1);
        self.print_line(&format!(
            "Filled ${:04X}-${:04X} with ${:02X}",
            address, last, value
        ))
    }

    fn disassemble(&mut self, address: HexToken, count: HexToken) -> Result<(), TransportError> {
        let address = address.or_zero(self.session.last_address());
        let count = count.or_zero(DEFAULT_DISASSEMBLY_COUNT);
        let (instructions, next) = disassemble(&self.memory, address, count as usize);
        for instruction in instructions {
            self.print_line(&instruction.to_string())?;
        }
        self.session.set_last_address(next);

        Ok(())
    }

    fn scan(&mut self, address: HexToken, length: HexToken) -> Result<(), TransportError> {
        let start = address.or_zero(USER_RAM_START);
        let length = length.or_zero(SCAN_DEFAULT_LENGTH);
        if start > USER_RAM_END {
            return self.print_error(&format!("Scan start beyond ${:04X}", USER_RAM_END));
        }
        let end = (start as u32 + length as u32 - 1).min(USER_RAM_END as u32) as u16;
        let report = scan_free_space(&self.memory, start, end);

        self.print_lines(report.render())
    }

    fn test(&mut self, address: HexToken, length: HexToken) -> Result<(), TransportError> {
        let start = address.or_zero(USER_RAM_START);
        let length = length.or_zero(RAM_TEST_DEFAULT_LENGTH);
        let report = test_ram(&mut self.memory, start, length);

        self.print_lines(report.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::RecordingExecutor;
    use crate::memory::MemoryStack;
    use crate::transport::ScriptedTransport;

    type TestMonitor = Monitor<ScriptedTransport, MemoryStack, RecordingExecutor>;

    fn get_monitor() -> TestMonitor {
        Monitor::new(
            MonitorConfig::default(),
            ScriptedTransport::default(),
            MemoryStack::new_with_ram(),
            RecordingExecutor::default(),
        )
    }

    /// Dispatch a line and return what the monitor printed, without the
    /// trailing empty piece after the last CRLF.
    fn run(monitor: &mut TestMonitor, line: &str) -> Vec<String> {
        monitor.dispatch(line).unwrap();
        let mut lines = monitor.transport_mut().take_lines();
        if lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        lines
    }

    #[test]
    fn test_write_then_read() {
        let mut monitor = get_monitor();

        assert_eq!(vec!["$0300 <- $7F"], run(&mut monitor, "W 0300 7F"));
        assert_eq!(0x0301, monitor.session().last_address());
        assert_eq!(vec!["$0300 = $7F"], run(&mut monitor, "R 0300"));
        assert_eq!(0x0301, monitor.session().last_address());
    }

    #[test]
    fn test_read_continues() {
        let mut monitor = get_monitor();
        monitor.memory_mut().load(0x0200, &[0x11, 0x22]);

        assert_eq!(vec!["$0200 = $11"], run(&mut monitor, "R"));
        assert_eq!(vec!["$0201 = $22"], run(&mut monitor, "r"));
        assert_eq!(0x0202, monitor.session().last_address());
    }

    #[test]
    fn test_read_explicit_zero() {
        let mut monitor = get_monitor();
        monitor.memory_mut().write_byte(0x0000, 0x42);

        assert_eq!(vec!["$0000 = $42"], run(&mut monitor, "R 0000"));
    }

    #[test]
    fn test_write_defaults_to_zero() {
        let mut monitor = get_monitor();
        monitor.memory_mut().write_byte(0x0000, 0x42);

        assert_eq!(vec!["$0000 <- $00"], run(&mut monitor, "W"));
        assert_eq!(0x00, monitor.memory().read_byte(0x0000));
    }

    #[test]
    fn test_dump() {
        let mut monitor = get_monitor();
        let lines = run(&mut monitor, "D 8000 20");

        assert_eq!(2, lines.len());
        assert!(lines[0].starts_with("8000: 00 00"));
        assert!(lines[1].starts_with("8010: "));
        assert_eq!(0x8020, monitor.session().last_address());
    }

    #[test]
    fn test_dump_default_length() {
        let mut monitor = get_monitor();

        assert_eq!(4, run(&mut monitor, "D 1000").len());
        assert_eq!(0x1040, monitor.session().last_address());
    }

    #[test]
    fn test_fill() {
        let mut monitor = get_monitor();

        assert_eq!(
            vec!["Filled $0200-$02FF with $EA"],
            run(&mut monitor, "F 0200 100 EA")
        );
        assert_eq!(0xea, monitor.memory().read_byte(0x0200));
        assert_eq!(0xea, monitor.memory().read_byte(0x02ff));
        assert_eq!(0x00, monitor.memory().read_byte(0x0300));
        assert_eq!(vec!["Nothing to fill"], run(&mut monitor, "F 0400 0 EA"));
        // fill does not move the current address
        assert_eq!(DEFAULT_LAST_ADDRESS, monitor.session().last_address());
    }

    #[test]
    fn test_go() {
        let mut monitor = get_monitor();

        assert_eq!(
            vec!["Executing at $1000...", "", "Returned from $1000"],
            run(&mut monitor, "G 1000")
        );
        assert_eq!(vec![0x1000], monitor.executor().calls);
    }

    #[test]
    fn test_disassemble_and_continue() {
        let mut monitor = get_monitor();
        monitor
            .memory_mut()
            .load(0x0200, &[0xea, 0xa9, 0x05, 0x4c, 0x00, 0x80, 0x60]);

        assert_eq!(
            vec![
                "0200  EA       NOP",
                "0201  A9 05    LDA# $05",
                "0203  4C 00 80 JMP $8000",
            ],
            run(&mut monitor, "M 0200 3")
        );
        assert_eq!(0x0206, monitor.session().last_address());
        assert_eq!(vec!["0206  60       RTS"], run(&mut monitor, "M 0 1"));
        assert_eq!(16, run(&mut monitor, "M").len());
    }

    #[test]
    fn test_load_mode() {
        let mut monitor = get_monitor();
        monitor.dispatch("L 0300").unwrap();

        assert!(matches!(monitor.mode(), InputMode::Load(_)));
        assert_eq!(
            "Load mode at $0300 (end with '.')\r\n:",
            monitor.transport().output()
        );

        monitor.transport_mut().push_input("A9 05\rEA.");
        while matches!(monitor.mode(), InputMode::Load(_)) {
            monitor.step().unwrap();
        }

        assert_eq!(
            "Load mode at $0300 (end with '.')\r\n:A9 05\r\n:EA\r\nLoaded 0003 bytes\r\n",
            monitor.transport().output()
        );
        assert_eq!(0xa9, monitor.memory().read_byte(0x0300));
        assert_eq!(0x05, monitor.memory().read_byte(0x0301));
        assert_eq!(0xea, monitor.memory().read_byte(0x0302));
        assert_eq!(0x0303, monitor.session().last_address());
        assert_eq!(&InputMode::Command, monitor.mode());
    }

    #[test]
    fn test_load_defaults_to_last_address() {
        let mut monitor = get_monitor();
        run(&mut monitor, "R 1233");
        run(&mut monitor, "L");

        assert_eq!(&InputMode::Load(Loader::new(0x1234)), monitor.mode());
    }

    #[test]
    fn test_scan_is_clamped_to_user_ram() {
        let mut monitor = get_monitor();
        let lines = run(&mut monitor, "S 3D00 1000");

        assert_eq!("Scanning $3D00-$3DFF...", lines[0]);
        assert_eq!("  Free: $3D00-$3DFF (256 bytes)", lines[1]);
        assert_eq!("  Total free: 256 / 256", lines.last().unwrap().as_str());
    }

    #[test]
    fn test_scan_defaults() {
        let mut monitor = get_monitor();
        let lines = run(&mut monitor, "S");

        // default length stops one byte short of the end of user RAM
        assert_eq!("Scanning $0200-$3DFE...", lines[0]);
        assert_eq!("  Total free: 15359 / 15359", lines.last().unwrap().as_str());
        assert_eq!(
            vec!["ERR: Scan start beyond $3DFF"],
            run(&mut monitor, "S 8000 10")
        );
    }

    #[test]
    fn test_ram_test_defaults() {
        let mut monitor = get_monitor();
        let lines = run(&mut monitor, "T");

        assert_eq!(vec!["RAM test $0200-$02FF", "", "OK: 256 bytes"], lines);
    }

    #[test]
    fn test_info_view_help() {
        let mut monitor = get_monitor();

        assert_eq!(info_report(), run(&mut monitor, "I"));
        assert_eq!(
            "ZP=$02-$FF  Stack=$3E-$3F",
            run(&mut monitor, "V").last().unwrap().as_str()
        );
        assert_eq!(HELP.len(), run(&mut monitor, "?").len());
    }

    #[test]
    fn test_unknown_and_empty() {
        let mut monitor = get_monitor();

        assert_eq!(vec!["ERR: Unknown command. H=help"], run(&mut monitor, "Z"));
        assert_eq!(Status::Continue, monitor.dispatch("   ").unwrap());
        assert_eq!("", monitor.transport().output());
    }

    #[test]
    fn test_quit() {
        let mut monitor = get_monitor();

        assert_eq!(Status::Quit, monitor.dispatch("q").unwrap());
        assert_eq!("Leaving monitor...\r\n", monitor.transport().output());
    }
}
