/*
 * Transfer of control to target code.
 * `call` hands the CPU over to the routine at `address` and only comes back
 * if that routine returns. Nothing here can interrupt or time-bound it: if
 * the target code never returns, the monitor never resumes.
 */
use log::info;

pub trait Executor {
    fn call(&mut self, address: u16);

    /// False when calls do not actually run any target code.
    fn has_cpu(&self) -> bool {
        true
    }
}

/// The host has no 6502 core to hand control to. Calls are logged and
/// return at once, as if the routine were a bare RTS.
#[derive(Debug, Default)]
pub struct HostExecutor;

impl Executor for HostExecutor {
    fn call(&mut self, address: u16) {
        info!("no CPU attached, call to #0x{:04X} returns immediately", address);
    }

    fn has_cpu(&self) -> bool {
        false
    }
}

/// Keeps track of every address control was handed to.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub calls: Vec<u16>,
}

impl Executor for RecordingExecutor {
    fn call(&mut self, address: u16) {
        self.calls.push(address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_executor_has_no_cpu() {
        let mut executor = HostExecutor;
        executor.call(0x0200);

        assert!(!executor.has_cpu());
    }

    #[test]
    fn test_recording_executor() {
        let mut executor = RecordingExecutor::default();
        executor.call(0x0200);
        executor.call(0x8000);

        assert!(executor.has_cpu());
        assert_eq!(vec![0x0200, 0x8000], executor.calls);
    }
}
