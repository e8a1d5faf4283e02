//! CI benchmark harness for a family of combinatorial-optimization solvers.
//!
//! This crate provides:
//! - A declarative registry of benchmark problem families and instances
//! - Deterministic solver invocation building over an explicit configuration
//! - Synchronous child-process execution with fail-fast result aggregation
//! - Retryable acquisition of the reference dataset archives

mod acquire;
mod config;
mod error;
mod harness;
mod invocation;
mod process;
mod registry;

pub use acquire::{
    acquire_datasets, acquire_with, AcquireError, AcquisitionJob, Acquirer, ArchiveExtractor,
    ArchiveFetcher, FetchConfig, FetchReport, HttpFetcher, JobState, RetryPolicy, ZipExtractor,
    ARCHIVE_FILE_NAME, DATASET_ARCHIVES, DATA_DIR_NAME, DEFAULT_FETCH_BASE_URL,
};
pub use config::{HarnessConfig, DEFAULT_SOLVER_DIR};
pub use error::HarnessError;
pub use harness::{Harness, RunReport};
pub use invocation::Invocation;
pub use process::{ProcessRunner, RunOutcome, SystemRunner};
pub use registry::{InstanceRef, ProblemFamily, Registry, FAMILIES};
