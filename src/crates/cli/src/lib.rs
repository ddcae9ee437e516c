pub mod cmd;

use clap::Parser;

/// `imposter-go [configDir]`, per spec.md §6. `config_dir` falls back to
/// `IMPOSTER_CONFIG_DIR` (comma-separated) when omitted — resolved inside
/// `imposter_config::load_config`, not here.
#[derive(Parser, Debug)]
#[command(name = "imposter-go", about = "A config-driven HTTP mock engine")]
pub struct Cli {
    pub config_dir: Option<String>,
}
