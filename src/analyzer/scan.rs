use super::is_free_byte;
use crate::memory::TargetMemory;

/// Shortest free run worth listing.
pub const MIN_REPORTED_RUN: usize = 16;
/// At most that many runs are listed, the others only count in totals.
pub const MAX_REPORTED_RUNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRun {
    pub start: u16,
    pub end: u16,
}

impl FreeRun {
    pub fn size(&self) -> usize {
        (self.end - self.start) as usize + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub start: u16,
    pub end: u16,
    pub runs: Vec<FreeRun>,
    pub zero_bytes: usize,
    pub erased_bytes: usize,
    pub used_bytes: usize,
}

impl ScanReport {
    fn new(start: u16, end: u16) -> Self {
        Self {
            start,
            end,
            runs: Vec::new(),
            zero_bytes: 0,
            erased_bytes: 0,
            used_bytes: 0,
        }
    }

    fn close_run(&mut self, start: u16, end: u16) {
        let run = FreeRun { start, end };
        if run.size() >= MIN_REPORTED_RUN && self.runs.len() < MAX_REPORTED_RUNS {
            self.runs.push(run);
        }
    }

    pub fn total_free(&self) -> usize {
        self.zero_bytes + self.erased_bytes
    }

    pub fn range_len(&self) -> usize {
        (self.end as usize + 1).saturating_sub(self.start as usize)
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![format!("Scanning ${:04X}-${:04X}...", self.start, self.end)];

        for run in &self.runs {
            lines.push(format!(
                "  Free: ${:04X}-${:04X} ({} bytes)",
                run.start,
                run.end,
                run.size()
            ));
        }
        lines.push(String::new());
        lines.push("Results:".to_owned());
        lines.push(format!("  $00 bytes: {}", self.zero_bytes));
        lines.push(format!("  $FF bytes: {}", self.erased_bytes));
        lines.push(format!("  Used bytes: {}", self.used_bytes));
        lines.push(format!(
            "  Total free: {} / {}",
            self.total_free(),
            self.range_len()
        ));

        lines
    }
}

/// Classify every byte of `[start, end]` as free or used and collect the
/// runs of free bytes. The scan never goes past $FFFF.
pub fn scan_free_space<M: TargetMemory + ?Sized>(memory: &M, start: u16, end: u16) -> ScanReport {
    let mut report = ScanReport::new(start, end);
    let mut run_start: Option<u16> = None;

    for addr in start..=end {
        let value = memory.read_byte(addr);

        if is_free_byte(value) {
            if value == 0x00 {
                report.zero_bytes += 1;
            } else {
                report.erased_bytes += 1;
            }
            run_start.get_or_insert(addr);
        } else {
            report.used_bytes += 1;
            if let Some(run) = run_start.take() {
                report.close_run(run, addr - 1);
            }
        }
    }

    if let Some(run) = run_start {
        report.close_run(run, end);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStack;

    #[test]
    fn test_empty_region_is_one_run() {
        let memory = MemoryStack::new_with_ram();
        let report = scan_free_space(&memory, 0x0200, 0x02ff);

        assert_eq!(vec![FreeRun { start: 0x0200, end: 0x02ff }], report.runs);
        assert_eq!(256, report.zero_bytes);
        assert_eq!(0, report.used_bytes);
        assert_eq!(256, report.total_free());
        assert_eq!(256, report.range_len());
    }

    #[test]
    fn test_runs_are_split_by_used_bytes() {
        let mut memory = MemoryStack::new_with_ram();
        memory.load(0x0220, &[0x12, 0xff, 0xff, 0x34]);
        memory.write_byte(0x0240, 0xea);
        let report = scan_free_space(&memory, 0x0200, 0x025f);

        assert_eq!(
            vec![
                FreeRun { start: 0x0200, end: 0x021f },
                FreeRun { start: 0x0224, end: 0x023f },
                FreeRun { start: 0x0241, end: 0x025f },
            ],
            report.runs
        );
        assert_eq!(3, report.used_bytes);
        assert_eq!(2, report.erased_bytes);
        assert_eq!(96 - 5, report.zero_bytes);
    }

    #[test]
    fn test_short_runs_only_count_in_totals() {
        let mut memory = MemoryStack::new_with_ram();
        for addr in (0x0200..0x0240).step_by(8) {
            memory.write_byte(addr, 0x01);
        }
        let report = scan_free_space(&memory, 0x0200, 0x023f);

        assert!(report.runs.is_empty());
        assert_eq!(8, report.used_bytes);
        assert_eq!(56, report.total_free());
    }

    #[test]
    fn test_reported_runs_are_capped() {
        let mut memory = MemoryStack::new_with_ram();
        for addr in (0x1000..0x1200).step_by(32) {
            memory.write_byte(addr, 0x01);
        }
        let report = scan_free_space(&memory, 0x1000, 0x11ff);

        assert_eq!(MAX_REPORTED_RUNS, report.runs.len());
        assert_eq!(16, report.used_bytes);
    }

    #[test]
    fn test_scan_stops_at_end_of_memory() {
        let memory = MemoryStack::new_with_ram();
        let report = scan_free_space(&memory, 0xfff0, 0xffff);

        assert_eq!(vec![FreeRun { start: 0xfff0, end: 0xffff }], report.runs);
        assert_eq!(16, report.runs[0].size());
        assert_eq!(16, report.range_len());
    }

    #[test]
    fn test_render() {
        let memory = MemoryStack::new_with_ram();
        let lines = scan_free_space(&memory, 0x0200, 0x021f).render();

        assert_eq!(
            vec![
                "Scanning $0200-$021F...",
                "  Free: $0200-$021F (32 bytes)",
                "",
                "Results:",
                "  $00 bytes: 32",
                "  $FF bytes: 0",
                "  Used bytes: 0",
                "  Total free: 32 / 32",
            ],
            lines
        );
    }
}
