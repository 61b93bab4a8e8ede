use super::is_free_byte;
use crate::memory::TargetMemory;

pub const SAMPLES_PER_PAGE: usize = 64;
pub const SAMPLE_STRIDE: usize = 4;
/// A page with at least that many used samples is shown as full.
pub const FULL_PAGE_THRESHOLD: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageUsage {
    Empty,
    Mixed,
    Full,
}

impl PageUsage {
    pub fn from_samples(used_samples: usize) -> Self {
        match used_samples {
            0 => Self::Empty,
            n if n >= FULL_PAGE_THRESHOLD => Self::Full,
            _ => Self::Mixed,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Empty => '.',
            Self::Mixed => 'X',
            Self::Full => '#',
        }
    }
}

/// Count the used bytes among the 64 samples taken in `page`.
pub fn sample_page<M: TargetMemory + ?Sized>(memory: &M, page: u8) -> usize {
    (0..SAMPLES_PER_PAGE)
        .map(|sample| u16::from_be_bytes([page, (sample * SAMPLE_STRIDE) as u8]))
        .filter(|&addr| !is_free_byte(memory.read_byte(addr)))
        .count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMap {
    pub pages: Vec<(u8, PageUsage)>,
}

impl PageMap {
    pub fn usage(&self, page: u8) -> Option<PageUsage> {
        self.pages
            .iter()
            .find(|(p, _)| *p == page)
            .map(|(_, usage)| *usage)
    }

    /// One row per 16 pages, a row ends after a page whose low nibble is 0.
    fn rows(&self) -> Vec<String> {
        let mut rows = Vec::new();
        let mut row = String::new();

        for (index, (page, usage)) in self.pages.iter().enumerate() {
            if row.is_empty() {
                row = format!("${:02X}: ", page);
            }
            row.push(usage.symbol());
            if page & 0x0F == 0x00 || index == self.pages.len() - 1 {
                rows.push(std::mem::take(&mut row));
            }
        }

        rows
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            "RAM map (. = free, # = used, X = mixed)".to_owned(),
            "Each character = 256 bytes (1 page)".to_owned(),
            String::new(),
            "     0123456789ABCDEF".to_owned(),
        ];
        lines.extend(self.rows());
        lines.push(String::new());
        lines.push("ZP=$02-$FF  Stack=$3E-$3F".to_owned());

        lines
    }
}

pub fn page_map<M: TargetMemory + ?Sized>(memory: &M, first_page: u8, last_page: u8) -> PageMap {
    let pages = (first_page..=last_page)
        .map(|page| (page, PageUsage::from_samples(sample_page(memory, page))))
        .collect();

    PageMap { pages }
}
