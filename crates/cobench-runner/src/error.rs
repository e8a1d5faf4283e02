use std::io;
use thiserror::Error;

/// Errors raised while preparing or executing benchmark invocations.
///
/// Configuration problems (unknown family, missing data root, bad instance
/// path) are detected before any solver process is spawned. Solver and I/O
/// failures abort the run immediately; nothing in the benchmark flow is
/// retried.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unknown problem family \"{0}\"")]
    UnknownFamily(String),

    #[error("{var} is not set; cannot locate the dataset root for {family}")]
    MissingDataRoot { family: String, var: String },

    #[error("instance path \"{0}\" must be relative and stay inside the dataset root")]
    InvalidInstancePath(String),

    #[error("solver for {family} exited with status {status} on {instance}")]
    SolverFailure {
        family: String,
        instance: String,
        /// Decimal exit code, or `signal` when the child was killed.
        status: String,
    },

    #[error("failed to spawn {binary}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
