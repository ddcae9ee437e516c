use imposter::Imposter;
use imposter_config::ImposterConfigError;
use imposter_errors::ImposterError;

/// Exit code 1 when the config directory itself is the problem (missing
/// positional argument and `IMPOSTER_CONFIG_DIR`, or a directory that
/// doesn't exist); 2 for everything else that keeps the server from
/// starting, per spec.md §6.
pub enum StartupFailure {
    ConfigDir(ImposterConfigError),
    Other(ImposterError),
}

impl StartupFailure {
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupFailure::ConfigDir(ImposterConfigError::NoConfigDir)
            | StartupFailure::ConfigDir(ImposterConfigError::MissingDir(_)) => 1,
            StartupFailure::ConfigDir(_) | StartupFailure::Other(_) => 2,
        }
    }
}

impl std::fmt::Display for StartupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupFailure::ConfigDir(e) => write!(f, "{e}"),
            StartupFailure::Other(e) => write!(f, "{e}"),
        }
    }
}

pub fn run_cmd(config_dir: Option<String>) -> Result<(), StartupFailure> {
    let config_dirs: Vec<String> = config_dir.into_iter().collect();
    let imposter = Imposter::from_paths(&config_dirs).map_err(StartupFailure::ConfigDir)?;
    imposter.run().map_err(StartupFailure::Other)
}
