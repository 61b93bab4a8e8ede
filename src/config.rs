use crate::line_editor::DEFAULT_LINE_CAPACITY;
use crate::memory::{MemoryStack, RAM, ROM};
use crate::memory_map::{DEFAULT_LAST_ADDRESS, ROM_END, ROM_START, STACK_END};
use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Monitor behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Size of the line buffer, terminator included.
    pub line_capacity: usize,
    /// Current address when the session starts.
    pub initial_address: u16,
    /// Print the banner when the session starts.
    pub banner: bool,
    /// Second line of the banner.
    pub target_name: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            line_capacity: DEFAULT_LINE_CAPACITY,
            initial_address: DEFAULT_LAST_ADDRESS,
            banner: true,
            target_name: "6502 target".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RamConfig {
    pub start: u16,
    pub size: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RomConfig {
    pub start: u16,
    pub size: usize,
    /// Content of the ROM, padded with $FF.
    pub image: Option<PathBuf>,
}

/// A binary file copied in memory before the session starts.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    pub address: u16,
    pub file: PathBuf,
}

/*
 * Layout of the simulated target the host binary runs the monitor against.
 * Without configuration file, this is the board the memory map describes:
 * RAM up to the end of the stack and an erased ROM.
 */
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub name: Option<String>,
    pub ram: RamConfig,
    pub rom: Option<RomConfig>,
    pub images: Vec<ImageConfig>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            name: None,
            ram: RamConfig {
                start: 0x0000,
                size: STACK_END as usize + 1,
            },
            rom: Some(RomConfig {
                start: ROM_START,
                size: (ROM_END - ROM_START) as usize + 1,
                image: None,
            }),
            images: Vec::new(),
        }
    }
}

impl TargetConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let mut config: TargetConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML from {}", path.display()))?;
        config.resolve_paths(path.parent().unwrap_or_else(|| Path::new("")));

        Ok(config)
    }

    /// Files are given relative to the config file directory.
    fn resolve_paths(&mut self, base_dir: &Path) {
        if let Some(rom) = &mut self.rom {
            if let Some(image) = &mut rom.image {
                *image = base_dir.join(&*image);
            }
        }
        for image in &mut self.images {
            image.file = base_dir.join(&image.file);
        }
    }

    pub fn build_memory(&self) -> Result<MemoryStack> {
        let mut memory = MemoryStack::default();
        memory
            .add_subsystem("RAM", self.ram.start as usize, RAM::new(self.ram.size))
            .context("Could not map the RAM")?;

        if let Some(rom_config) = &self.rom {
            let rom = match &rom_config.image {
                Some(path) => {
                    let image = std::fs::read(path)
                        .with_context(|| format!("Could not read ROM image {}", path.display()))?;
                    info!("ROM image {} ({} bytes)", path.display(), image.len());
                    ROM::from_image(&image, rom_config.size)
                        .with_context(|| format!("ROM image {} does not fit", path.display()))?
                }
                None => ROM::blank(rom_config.size),
            };
            memory
                .add_subsystem("ROM", rom_config.start as usize, rom)
                .context("Could not map the ROM")?;
        }

        for image in &self.images {
            let data = std::fs::read(&image.file)
                .with_context(|| format!("Could not read image {}", image.file.display()))?;
            let len = memory.load(image.address, &data);
            info!(
                "loaded {} bytes from {} at #0x{:04X}",
                len,
                image.file.display(),
                image.address
            );
        }

        Ok(memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::TargetMemory;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_target() {
        let memory = TargetConfig::default().build_memory().unwrap();

        assert_eq!(0x00, memory.read_byte(0x3fff));
        assert_eq!(0xff, memory.read_byte(0x4000));
        assert_eq!(0xff, memory.read_byte(0x8000));
        assert_eq!(2, memory.get_subsystems_info().len());
    }

    #[test]
    fn test_load_config() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("rom.bin"), [0xea, 0x60]).unwrap();
        std::fs::write(dir.path().join("prog.bin"), [0xa9, 0x05]).unwrap();
        let config_path = dir.path().join("target.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            "name: test board\nram:\n  start: 0\n  size: 0x8000\nrom:\n  start: 0xE000\n  size: 0x2000\n  image: rom.bin\nimages:\n  - address: 0x0200\n    file: prog.bin"
        )
        .unwrap();

        let config = TargetConfig::load(&config_path).unwrap();
        assert_eq!(Some("test board".to_owned()), config.name);
        assert_eq!(0x8000, config.ram.size);
        assert_eq!(dir.path().join("prog.bin"), config.images[0].file);

        let memory = config.build_memory().unwrap();
        assert_eq!(0xa9, memory.read_byte(0x0200));
        assert_eq!(0x00, memory.read_byte(0x7fff));
        assert_eq!(0xea, memory.read_byte(0xe000));
        assert_eq!(0xff, memory.read_byte(0xe002));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: TargetConfig = serde_yaml::from_str("rom: ~").unwrap();

        assert_eq!(None, config.rom);
        assert_eq!(TargetConfig::default().ram, config.ram);
    }

    #[test]
    fn test_bad_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("target.yaml");
        std::fs::write(&config_path, "ram: 12\n").unwrap();

        assert!(TargetConfig::load(&config_path).is_err());
        assert!(TargetConfig::load(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_missing_image() {
        let config = TargetConfig {
            images: vec![ImageConfig {
                address: 0x0200,
                file: PathBuf::from("/nonexistent/prog.bin"),
            }],
            ..TargetConfig::default()
        };

        assert!(config.build_memory().is_err());
    }
}
