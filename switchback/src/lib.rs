//! # Switchback
//!
//! Concurrent SSH backup of running configurations from multi-vendor
//! network switches.
//!
//! Switchback takes a plain-text host list (`address username password`
//! per line), logs in to every device in parallel, works out which CLI
//! dialect it speaks, pulls the running configuration and writes it to a
//! dated directory tree. Each host gets exactly one result line, in input
//! order, whether its backup succeeded or not.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, with password auth and known_hosts checking
//! - Dialect detection for Cisco (IOS, IOS XR, NX-OS, ASA), Arista, Juniper,
//!   H3C/HPE Comware, Huawei and Linux hosts
//! - Tail-search prompt matching with automatic pager handling
//! - Bounded concurrency with per-host failure isolation
//! - Atomic artifact writes under `<root>/<YYYY-MM-DD>/<address>`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use switchback::{BackupOrchestrator, RunConfig, SshConnector, parse_host_list};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), switchback::Error> {
//!     let config = RunConfig::from_toml_str("output_dir = \"/srv/backups\"")?;
//!     let connector = Arc::new(SshConnector::new(config.session_settings()));
//!     let orchestrator = BackupOrchestrator::new(connector, config)?;
//!
//!     let hosts = parse_host_list("10.0.0.1 admin secret")?;
//!     let report = orchestrator.run(hosts).await;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod detect;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod hosts;
pub mod local_store;
pub mod orchestrator;
pub mod report;
pub mod retrieve;
pub mod store;
pub mod transport;

// Re-export main types for convenience
pub use config::{RunConfig, Timeouts};
pub use detect::{DialectDetector, SshProbe, classify};
pub use dialect::{Dialect, DialectProfile, DialectRegistry};
pub use driver::{
    Connector, Driver, DriverBuilder, GenericDriver, Response, SessionSettings, SshConnector,
};
pub use error::Error;
pub use hosts::{HostCredential, parse_host_list};
pub use local_store::{FileInputStore, InputStore};
pub use orchestrator::{BackupOrchestrator, run_date};
pub use report::{BackupReport, BackupResult, Outcome};
pub use retrieve::{ConfigRetriever, extract_config_span};
pub use store::BackupStore;
pub use transport::{HostKeyVerification, SshConfig};
