//! Retryable acquisition of the reference dataset archives.
//!
//! Each archive id resolves to one remote archive, downloaded to a transient
//! file, expanded into the local data directory, then deleted. The whole
//! download-extract-clean sequence is one attempt; a fixed retry budget with
//! a blocking backoff wraps it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Opaque remote identifiers for the reference dataset archives, acquired in
/// declaration order.
pub const DATASET_ARCHIVES: &[&str] = &[
    "1NU1o0ld91i5jqUGbbBRokx932IXTdtnr",
    "1IPmVu2rtrLcDyaLzwml5aiAKLPEylMc8",
    "13mKjzk-eQfXoRuVQjbwaERkbucg7nvn3",
    "1o_MQHcFEg4_TL6FaCMxXd7sWPFQiAFvG",
    "1nf9f0hdYy5Nk2aUJjUObVK6nAa0I0Uwb",
    "1CdYNxVGoh8U4936U5lzpvJqWVRqr7wzg",
];

pub const DEFAULT_FETCH_BASE_URL: &str = "https://drive.google.com";

/// Transient archive file name inside the work directory.
pub const ARCHIVE_FILE_NAME: &str = "data.zip";
/// Directory the archives are expanded into.
pub const DATA_DIR_NAME: &str = "data";

/// Errors raised while acquiring a dataset archive.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("download of archive {id} failed")]
    Download {
        id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("extraction of {} failed", .archive.display())]
    Extract {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("archive {id} could not be acquired after {attempts} attempts")]
    Exhausted {
        id: String,
        attempts: u32,
        #[source]
        source: Box<AcquireError>,
    },
}

/// Downloads one archive id to a local file.
pub trait ArchiveFetcher {
    fn fetch(&self, archive_id: &str, dest: &Path) -> Result<(), AcquireError>;
}

/// Expands a downloaded archive into a directory. Success is inferred purely
/// from the absence of an error; no manifest or checksum is verified.
pub trait ArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), AcquireError>;
}

/// Blocking HTTP fetcher resolving archive ids against a fixed host.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_FETCH_BASE_URL)
    }

    /// Points the fetcher at another host, for tests against a local server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn archive_url(&self, archive_id: &str) -> String {
        format!(
            "{}/uc?export=download&id={}",
            self.base_url.trim_end_matches('/'),
            archive_id
        )
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, archive_id: &str, dest: &Path) -> Result<(), AcquireError> {
        let url = self.archive_url(archive_id);
        debug!(%url, dest = %dest.display(), "downloading archive");
        let mut response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| AcquireError::Download {
                id: archive_id.to_string(),
                source,
            })?
            .error_for_status()
            .map_err(|source| AcquireError::Download {
                id: archive_id.to_string(),
                source,
            })?;
        let mut file = fs::File::create(dest)?;
        io::copy(&mut response, &mut file)?;
        Ok(())
    }
}

/// Zip-based extractor over the downloaded archive file.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), AcquireError> {
        let file = fs::File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file).map_err(|source| AcquireError::Extract {
            archive: archive.to_path_buf(),
            source,
        })?;
        fs::create_dir_all(dest)?;
        debug!(entries = zip.len(), dest = %dest.display(), "extracting archive");
        zip.extract(dest).map_err(|source| AcquireError::Extract {
            archive: archive.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

/// Attempt budget and fixed backoff for one acquisition job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(10),
        }
    }
}

/// Acquisition progress for a single archive id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Downloading,
    Extracting,
    Cleaning,
    Done,
}

/// One dataset download, mutated by the retry controller across attempts and
/// discarded on success or exhaustion.
#[derive(Debug)]
pub struct AcquisitionJob {
    pub archive_id: String,
    pub archive_path: PathBuf,
    pub extract_dir: PathBuf,
    /// Retries left after the current attempt.
    pub attempts_remaining: u32,
    pub state: JobState,
}

impl AcquisitionJob {
    pub fn new(archive_id: impl Into<String>, work_dir: &Path, policy: &RetryPolicy) -> Self {
        Self {
            archive_id: archive_id.into(),
            archive_path: work_dir.join(ARCHIVE_FILE_NAME),
            extract_dir: work_dir.join(DATA_DIR_NAME),
            attempts_remaining: policy.attempts.saturating_sub(1),
            state: JobState::Pending,
        }
    }
}

/// Drives acquisition jobs through download, extraction and cleanup,
/// restarting failed attempts after a fixed blocking backoff.
pub struct Acquirer<F, X> {
    fetcher: F,
    extractor: X,
    policy: RetryPolicy,
    sleeper: Box<dyn FnMut(Duration)>,
}

impl<F: ArchiveFetcher, X: ArchiveExtractor> Acquirer<F, X> {
    pub fn new(fetcher: F, extractor: X, policy: RetryPolicy) -> Self {
        Self::with_sleeper(fetcher, extractor, policy, thread::sleep)
    }

    /// Like [`Acquirer::new`] with the backoff wait injected, so tests can
    /// count sleeps instead of serving them.
    pub fn with_sleeper(
        fetcher: F,
        extractor: X,
        policy: RetryPolicy,
        sleeper: impl FnMut(Duration) + 'static,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            policy,
            sleeper: Box::new(sleeper),
        }
    }

    pub fn job(&self, archive_id: &str, work_dir: &Path) -> AcquisitionJob {
        AcquisitionJob::new(archive_id, work_dir, &self.policy)
    }

    /// Runs one job to completion. Fails only once the attempt budget is
    /// exhausted; earlier failures sleep the fixed backoff and restart the
    /// job from scratch. Partial artifacts of a failed attempt are left in
    /// place for the re-attempt to overwrite.
    pub fn acquire(&mut self, job: &mut AcquisitionJob) -> Result<(), AcquireError> {
        loop {
            match self.attempt(job) {
                Ok(()) => return Ok(()),
                Err(source) => {
                    job.state = JobState::Pending;
                    if job.attempts_remaining == 0 {
                        return Err(AcquireError::Exhausted {
                            id: job.archive_id.clone(),
                            attempts: self.policy.attempts,
                            source: Box::new(source),
                        });
                    }
                    job.attempts_remaining -= 1;
                    warn!(
                        id = %job.archive_id,
                        backoff_secs = self.policy.backoff.as_secs(),
                        error = %source,
                        "acquisition attempt failed, backing off"
                    );
                    (self.sleeper)(self.policy.backoff);
                }
            }
        }
    }

    /// Download, extract, delete the archive, strictly in that order.
    /// Extraction must fully complete before the archive is removed, and a
    /// removal failure fails the attempt rather than completing the job.
    fn attempt(&self, job: &mut AcquisitionJob) -> Result<(), AcquireError> {
        job.state = JobState::Downloading;
        self.fetcher.fetch(&job.archive_id, &job.archive_path)?;
        job.state = JobState::Extracting;
        self.extractor.extract(&job.archive_path, &job.extract_dir)?;
        job.state = JobState::Cleaning;
        fs::remove_file(&job.archive_path)?;
        job.state = JobState::Done;
        Ok(())
    }
}

/// Local layout for the acquisition flow.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory receiving the transient archive and the expanded data tree.
    pub work_dir: PathBuf,
}

/// Summary of a completed acquisition run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    pub archives: usize,
}

/// Acquires every registered dataset archive sequentially with the default
/// fetcher, extractor and retry policy. The first exhausted job aborts the
/// run; nothing is skipped silently.
pub fn acquire_datasets(config: &FetchConfig) -> Result<FetchReport, AcquireError> {
    let mut acquirer = Acquirer::new(HttpFetcher::new(), ZipExtractor, RetryPolicy::default());
    acquire_with(&mut acquirer, config)
}

/// Acquisition loop over the registered ids, generic over the fetcher and
/// extractor seams.
pub fn acquire_with<F: ArchiveFetcher, X: ArchiveExtractor>(
    acquirer: &mut Acquirer<F, X>,
    config: &FetchConfig,
) -> Result<FetchReport, AcquireError> {
    fs::create_dir_all(&config.work_dir)?;
    for archive_id in DATASET_ARCHIVES {
        let mut job = acquirer.job(archive_id, &config.work_dir);
        acquirer.acquire(&mut job)?;
    }
    Ok(FetchReport {
        archives: DATASET_ARCHIVES.len(),
    })
}
