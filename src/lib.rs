pub mod analyzer;
pub mod commands;
pub mod config;
pub mod disassembler;
pub mod executor;
pub mod hex_codec;
pub mod hexdump;
pub mod line_editor;
pub mod memory;
pub mod memory_map;
pub mod monitor;
pub mod opcode;
pub mod scanner;
pub mod transport;

pub const VERSION: &str = "1.0";

pub use commands::Command;
pub use config::{MonitorConfig, TargetConfig};
pub use executor::{Executor, HostExecutor, RecordingExecutor};
pub use line_editor::{InputMode, LineEditor, Loader};
pub use memory::{AddressableIO, MemoryError, MemoryStack, TargetMemory};
pub use monitor::{Monitor, Session, Status};
pub use transport::{ScriptedTransport, StreamTransport, Transport, TransportError};
