use clap::Parser;
use tracing::error;

mod cli;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    if let Err(err) = cli::init_logging(args.log_level.as_deref(), args.json_logs) {
        eprintln!("failed to initialise logging: {err:#}");
        std::process::exit(1);
    }
    if let Err(err) = cli::dispatch(args).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
