use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use tokio::sync::mpsc;

use switchback::{
    BackupOrchestrator, FileInputStore, HostCredential, HostKeyVerification, InputStore, RunConfig,
    SshConnector, parse_host_list, run_date,
};

#[derive(Parser)]
#[command(name = "switchback")]
#[command(about = "Back up running configurations of network switches over SSH", long_about = None)]
#[command(version)]
struct Cli {
    /// Host list (`address username password` per line), or `-` for stdin.
    /// Defaults to the last saved host list.
    #[arg(long, value_name = "FILE|-")]
    hosts: Option<String>,

    /// TOML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory of the dated backup tree
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum number of hosts backed up at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// SSH port
    #[arg(short, long)]
    port: Option<u16>,

    /// Host key checking: strict, accept-new or disabled
    #[arg(long)]
    host_key_checking: Option<HostKeyVerification>,

    /// Where the last host list is saved
    #[arg(long, default_value = "data")]
    state: PathBuf,

    /// Do not save the host list for the next run
    #[arg(long)]
    no_save: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let (config, hosts) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    match run(config, hosts).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Load the run configuration and the host list.
fn prepare(cli: &Cli) -> Result<(RunConfig, Vec<HostCredential>)> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_toml_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(mode) = cli.host_key_checking {
        config.host_key_verification = mode;
    }
    config.validate()?;

    let store = FileInputStore::new(&cli.state);
    let input = match cli.hosts.as_deref() {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read host list from stdin")?;
            text
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read host list {path}"))?,
        None => {
            info!("no --hosts given, reusing {}", cli.state.display());
            store.load()
        }
    };

    let hosts = parse_host_list(&input).context("Invalid host list")?;
    if hosts.is_empty() {
        anyhow::bail!("Host list is empty");
    }

    if cli.hosts.is_some() && !cli.no_save {
        store.save(&input)?;
    }

    Ok((config, hosts))
}

/// Run the backup and print the report. Returns whether every host succeeded.
async fn run(config: RunConfig, hosts: Vec<HostCredential>) -> Result<bool> {
    let connector = Arc::new(SshConnector::new(config.session_settings()));
    let orchestrator = BackupOrchestrator::new(connector, config)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(result) = rx.recv().await {
            eprintln!("{result}");
        }
    });

    let date = run_date();
    let report = orchestrator.run_with_progress(hosts, &date, tx).await;
    let _ = printer.await;

    println!("{report}");
    Ok(report.is_all_success())
}
