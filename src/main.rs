/*
 * Host frontend: runs the monitor against a simulated target, the operator
 * being the terminal (or a script file).
 */
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::terminal;
use crossterm::tty::IsTty;
use log::{info, warn};

use soft65c02_monitor::hex_codec::parse_u16;
use soft65c02_monitor::memory::ADDRESS_SPACE;
use soft65c02_monitor::{
    HostExecutor, MemoryStack, Monitor, MonitorConfig, StreamTransport, TargetConfig,
    TransportError,
};

const DEFAULT_TARGET_NAME: &str = "Host simulated target";

/// 6502 memory monitor
/// Inspect, patch and analyze the memory of a simulated 6502 target through
/// the same single character protocol the monitor speaks over a UART.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct CommandLineArguments {
    /// Target description (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Copy a binary file in memory before starting, ADDR is hexadecimal
    #[arg(short, long, value_name = "ADDR:FILE", value_parser = parse_load)]
    load: Vec<(u16, PathBuf)>,

    /// Write bytes in memory before starting, ex: 0200=A90560
    #[arg(short, long, value_name = "ADDR=HEXBYTES", value_parser = parse_poke)]
    poke: Vec<(u16, Vec<u8>)>,

    /// Read operator input from this file instead of the terminal
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Do not display the banner
    #[arg(long)]
    no_banner: bool,

    /// Raise log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_address(text: &str) -> Result<u16, String> {
    let (address, digits) = parse_u16(text.as_bytes());

    if digits == 0 || digits != text.len() {
        return Err(format!("'{}' is not a hexadecimal address", text));
    }

    Ok(address)
}

fn parse_load(arg: &str) -> Result<(u16, PathBuf), String> {
    let (address, file) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected ADDR:FILE, got '{}'", arg))?;

    Ok((parse_address(address)?, PathBuf::from(file)))
}

fn parse_poke(arg: &str) -> Result<(u16, Vec<u8>), String> {
    let (address, bytes) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=HEXBYTES, got '{}'", arg))?;
    let bytes = hex::decode(bytes).map_err(|e| format!("invalid bytes '{}': {}", bytes, e))?;

    Ok((parse_address(address)?, bytes))
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn build_memory(parameters: &CommandLineArguments, target: &TargetConfig) -> Result<MemoryStack> {
    let mut memory = target.build_memory()?;

    for subsystem in memory.get_subsystems_info() {
        info!("{}", subsystem);
    }
    for (address, path) in &parameters.load {
        let data =
            std::fs::read(path).with_context(|| format!("Could not read {}", path.display()))?;
        if *address as usize + data.len() > ADDRESS_SPACE {
            warn!(
                "{} ({} bytes) wraps around to #0x0000 when loaded at #0x{:04X}",
                path.display(),
                data.len(),
                address
            );
        }
        let len = memory.load(*address, &data);
        info!("loaded {} bytes from {} at #0x{:04X}", len, path.display(), address);
    }
    for (address, bytes) in &parameters.poke {
        memory.load(*address, bytes);
    }

    Ok(memory)
}

/// Terminal raw mode for as long as this lives, so the monitor is the only
/// one echoing characters.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Could not switch the terminal to raw mode")?;

        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("could not restore the terminal: {}", e);
        }
    }
}

fn main() -> Result<()> {
    let parameters = CommandLineArguments::parse();
    init_logger(parameters.verbose);

    let target = match &parameters.config {
        Some(path) => TargetConfig::load(path)?,
        None => TargetConfig::default(),
    };
    let memory = build_memory(&parameters, &target)?;
    let config = MonitorConfig {
        banner: !parameters.no_banner,
        target_name: target
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET_NAME.to_owned()),
        ..MonitorConfig::default()
    };

    let (input, _raw_mode): (Box<dyn Read>, Option<RawMode>) = match &parameters.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Could not open script {}", path.display()))?;
            (Box::new(BufReader::new(file)), None)
        }
        None => {
            let stdin = io::stdin();
            let raw_mode = if stdin.is_tty() {
                Some(RawMode::enable()?)
            } else {
                None
            };
            (Box::new(stdin), raw_mode)
        }
    };
    let transport = StreamTransport::new(input, io::stdout());
    let mut monitor = Monitor::new(config, transport, memory, HostExecutor);

    match monitor.run() {
        Ok(()) => info!("session closed by the operator"),
        Err(TransportError::Closed) => info!("end of operator input"),
        Err(e) => return Err(anyhow!(e).context("Monitor session aborted")),
    }
    let (mut transport, _, _) = monitor.into_parts();
    transport.flush()?;

    Ok(())
}
