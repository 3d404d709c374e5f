//! Concurrent backup runs.
//!
//! Every host runs as its own tokio task: detect the dialect, retrieve the
//! configuration, write the artifact. A semaphore bounds how many hosts
//! are in flight. Whatever happens inside a task (errors, panics) ends up
//! as that host's [`BackupResult`]; it never reaches other hosts or the run.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::join_all;
use log::{debug, info, warn};
use tokio::sync::Semaphore;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::RunConfig;
use crate::detect::DialectDetector;
use crate::dialect::Dialect;
use crate::driver::Connector;
use crate::error::Result;
use crate::hosts::HostCredential;
use crate::report::{BackupReport, BackupResult};
use crate::retrieve::ConfigRetriever;
use crate::store::BackupStore;

/// Today's date in the local timezone, as used for artifact directories.
pub fn run_date() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Detect, retrieve and store for a single host.
struct HostPipeline<C> {
    detector: DialectDetector<C>,
    retriever: ConfigRetriever<C>,
    store: BackupStore,
}

impl<C: Connector> HostPipeline<C> {
    async fn backup(&self, host: &HostCredential, date: &str) -> BackupResult {
        let dialect = self.detector.detect(host).await;

        match self.retrieve_and_store(host, dialect, date).await {
            Ok(path) => {
                info!(
                    "{}: saved {} ({})",
                    host.address,
                    path.display(),
                    dialect
                );
                BackupResult::success(&host.address)
            }
            Err(e) => {
                info!("{}: backup failed ({}): {}", host.address, dialect, e);
                BackupResult::failure(&host.address, e.kind())
            }
        }
    }

    async fn retrieve_and_store(
        &self,
        host: &HostCredential,
        dialect: Dialect,
        date: &str,
    ) -> Result<PathBuf> {
        let config = self.retriever.retrieve(host, dialect).await?;
        self.store.write(date, &host.address, &config).await
    }
}

/// Runs backups for a list of hosts.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use switchback::{BackupOrchestrator, RunConfig, SshConnector, parse_host_list};
///
/// # async fn example() -> Result<(), switchback::Error> {
/// let config = RunConfig::default();
/// let connector = Arc::new(SshConnector::new(config.session_settings()));
/// let orchestrator = BackupOrchestrator::new(connector, config)?;
///
/// let hosts = parse_host_list("10.0.0.1 admin secret\n10.0.0.2 admin secret2")?;
/// let report = orchestrator.run(hosts).await;
/// println!("{report}");
/// # Ok(())
/// # }
/// ```
pub struct BackupOrchestrator<C> {
    pipeline: Arc<HostPipeline<C>>,
    concurrency: usize,
}

impl<C: Connector + 'static> BackupOrchestrator<C> {
    /// Create an orchestrator writing below `config.output_dir`.
    pub fn new(connector: Arc<C>, config: RunConfig) -> Result<Self> {
        config.validate()?;

        let pipeline = HostPipeline {
            detector: DialectDetector::new(connector.clone(), config.timeouts.probe()),
            retriever: ConfigRetriever::new(connector, config.timeouts.read()),
            store: BackupStore::new(config.output_dir.clone()),
        };

        Ok(Self {
            pipeline: Arc::new(pipeline),
            concurrency: config.concurrency,
        })
    }

    /// The store artifacts are written to.
    pub fn store(&self) -> &BackupStore {
        &self.pipeline.store
    }

    /// Back up every host, dated today.
    pub async fn run(&self, hosts: Vec<HostCredential>) -> BackupReport {
        self.run_on(hosts, &run_date()).await
    }

    /// Back up every host into the directory for `date`.
    pub async fn run_on(&self, hosts: Vec<HostCredential>, date: &str) -> BackupReport {
        self.execute(hosts, date, None).await
    }

    /// Like [`run_on`](Self::run_on), also sending each result on
    /// `progress` as soon as its host finishes.
    pub async fn run_with_progress(
        &self,
        hosts: Vec<HostCredential>,
        date: &str,
        progress: UnboundedSender<BackupResult>,
    ) -> BackupReport {
        self.execute(hosts, date, Some(progress)).await
    }

    async fn execute(
        &self,
        hosts: Vec<HostCredential>,
        date: &str,
        progress: Option<UnboundedSender<BackupResult>>,
    ) -> BackupReport {
        info!(
            "starting backup of {} host(s), concurrency {}, date {}",
            hosts.len(),
            self.concurrency,
            date
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let date: Arc<str> = Arc::from(date);
        let mut addresses = Vec::with_capacity(hosts.len());
        let mut handles = Vec::with_capacity(hosts.len());

        for host in hosts {
            addresses.push(host.address.clone());

            let semaphore = semaphore.clone();
            let pipeline = self.pipeline.clone();
            let progress = progress.clone();
            let date = date.clone();

            handles.push(tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => pipeline.backup(&host, &date).await,
                    Err(_) => BackupResult::failure(&host.address, "Cancelled"),
                };
                if let Some(progress) = &progress {
                    let _ = progress.send(result.clone());
                }
                result
            }));
        }

        let joined = join_all(handles).await;

        let mut results = Vec::with_capacity(joined.len());
        for (address, outcome) in addresses.into_iter().zip(joined) {
            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    let kind = if e.is_panic() { "Panic" } else { "Cancelled" };
                    warn!("{}: backup task ended abnormally: {}", address, e);
                    let result = BackupResult::failure(address, kind);
                    if let Some(progress) = &progress {
                        let _ = progress.send(result.clone());
                    }
                    result
                }
            };
            results.push(result);
        }

        let report = BackupReport::new(results);
        debug!(
            "backup finished: {} succeeded, {} failed",
            report.successes().count(),
            report.failures().count()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_date_format() {
        let date = run_date();
        assert_eq!(date.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }
}
