use clap::Parser;
use imposter_cli::cmd::run::run_cmd;
use imposter_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_env("IMPOSTER_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(failure) = run_cmd(cli.config_dir) {
        eprintln!("{failure}");
        std::process::exit(failure.exit_code());
    }
}
