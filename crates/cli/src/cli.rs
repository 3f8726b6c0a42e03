use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intelx_client::{IntelXClient, IntelXConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "intelx")]
#[command(about = "Inspect and control analysis jobs on an IntelX instance")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Base URL of the IntelX instance. Falls back to INTELX_URL.
    #[arg(long)]
    pub url: Option<String>,

    /// API token. Falls back to INTELX_TOKEN.
    #[arg(long)]
    pub token: Option<String>,

    /// Per-request timeout in seconds. Falls back to INTELX_TIMEOUT_SECS,
    /// no timeout when neither is set.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Extra PEM root certificate for instances behind a private CA. Falls
    /// back to INTELX_CA_CERT.
    #[arg(long)]
    pub ca_cert: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error). Defaults to RUST_LOG, then warn.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List jobs.
    List,
    /// Show one job with its reports.
    Get { id: u64 },
    /// Save the file sample of a job.
    DownloadSample {
        id: u64,
        #[arg(long, short)]
        output: PathBuf,
    },
    Delete { id: u64 },
    Kill { id: u64 },
    KillAnalyzer { id: u64, name: String },
    RetryAnalyzer { id: u64, name: String },
    KillConnector { id: u64, name: String },
    RetryConnector { id: u64, name: String },
}

pub fn init_logging(log_level: Option<&str>, json: bool) -> Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

/// Environment config with the command-line flags taking precedence.
fn build_config(args: &Args) -> Result<IntelXConfig> {
    let config = IntelXConfig::from_env_with(|name| match name {
        "INTELX_URL" => args.url.clone(),
        "INTELX_TOKEN" => args.token.clone(),
        "INTELX_TIMEOUT_SECS" => args.timeout.map(|secs| secs.to_string()),
        "INTELX_CA_CERT" => args.ca_cert.as_ref().map(|p| p.display().to_string()),
        _ => None,
    })?;
    Ok(config)
}

pub async fn dispatch(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let client = IntelXClient::new(&config).context("build IntelX client")?;
    let jobs = client.jobs();

    match args.cmd {
        Command::List => print_json(&jobs.list().await.context("list jobs")?),
        Command::Get { id } => print_json(
            &jobs
                .get(id)
                .await
                .with_context(|| format!("get job {id}"))?,
        ),
        Command::DownloadSample { id, output } => {
            let sample = jobs
                .download_sample(id)
                .await
                .with_context(|| format!("download sample of job {id}"))?;
            tokio::fs::write(&output, &sample)
                .await
                .with_context(|| format!("write sample to {}", output.display()))?;
            info!(job_id = id, bytes = sample.len(), path = %output.display(), "Sample saved");
            Ok(())
        }
        Command::Delete { id } => {
            print_flag(jobs.delete(id).await.with_context(|| format!("delete job {id}"))?)
        }
        Command::Kill { id } => {
            print_flag(jobs.kill(id).await.with_context(|| format!("kill job {id}"))?)
        }
        Command::KillAnalyzer { id, name } => print_flag(
            jobs.kill_analyzer(id, &name)
                .await
                .with_context(|| format!("kill analyzer {name} of job {id}"))?,
        ),
        Command::RetryAnalyzer { id, name } => print_flag(
            jobs.retry_analyzer(id, &name)
                .await
                .with_context(|| format!("retry analyzer {name} of job {id}"))?,
        ),
        Command::KillConnector { id, name } => print_flag(
            jobs.kill_connector(id, &name)
                .await
                .with_context(|| format!("kill connector {name} of job {id}"))?,
        ),
        Command::RetryConnector { id, name } => print_flag(
            jobs.retry_connector(id, &name)
                .await
                .with_context(|| format!("retry connector {name} of job {id}"))?,
        ),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_flag(done: bool) -> Result<()> {
    println!("{done}");
    Ok(())
}
