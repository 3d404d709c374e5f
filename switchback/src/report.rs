//! Per-host outcomes and the run report.

use std::fmt;

/// How a single host's backup ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The configuration was retrieved and stored.
    Success,

    /// The backup failed; `kind` is the failure class name.
    Failure { kind: String },
}

impl Outcome {
    /// Build a failure outcome.
    pub fn failure(kind: impl Into<String>) -> Self {
        Outcome::Failure { kind: kind.into() }
    }
}

/// Result of backing up one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResult {
    /// Address as given in the host list.
    pub address: String,

    /// What happened.
    pub outcome: Outcome,
}

impl BackupResult {
    /// A successful result for `address`.
    pub fn success(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            outcome: Outcome::Success,
        }
    }

    /// A failed result for `address`.
    pub fn failure(address: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            outcome: Outcome::failure(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

impl fmt::Display for BackupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Success => write!(f, "{}_success", self.address),
            Outcome::Failure { kind } => write!(f, "{}_{}", self.address, kind),
        }
    }
}

/// Results of a run, in host-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    results: Vec<BackupResult>,
}

impl BackupReport {
    pub fn new(results: Vec<BackupResult>) -> Self {
        Self { results }
    }

    /// All results in submission order.
    pub fn results(&self) -> &[BackupResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results whose backup succeeded.
    pub fn successes(&self) -> impl Iterator<Item = &BackupResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    /// Results whose backup failed.
    pub fn failures(&self) -> impl Iterator<Item = &BackupResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// True when every host succeeded (vacuously true for an empty run).
    pub fn is_all_success(&self) -> bool {
        self.results.iter().all(BackupResult::is_success)
    }
}

impl fmt::Display for BackupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{result}")?;
        }
        Ok(())
    }
}
