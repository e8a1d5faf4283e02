//! Child-process execution behind a narrow seam.

use std::io;
use std::process::Command;

use tracing::debug;

use crate::invocation::Invocation;

/// Executes one resolved invocation and reports its exit code (`None` when
/// the child was killed by a signal).
///
/// Implementations block until the child terminates. No timeout is imposed;
/// a hung solver blocks the whole run.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>>;
}

/// Spawns the solver as a real child process with inherited stdio and
/// environment, so solver logs appear inline with the harness output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        debug!(binary = %invocation.binary_path.display(), "spawning solver");
        let status = Command::new(&invocation.binary_path)
            .args(&invocation.arguments)
            .status()?;
        Ok(status.code())
    }
}

/// Exit record for one executed invocation, consumed once by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub family: &'static str,
    pub instance: String,
    pub exit_code: Option<i32>,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit status as printed in failure reports: decimal code or `signal`.
    pub fn status_label(&self) -> String {
        self.exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "signal".to_string())
    }
}
