//! Command-line interface.
//!
//! Flags are folded into the file (or default) configuration, then the
//! result is validated once more before startup.

use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{load_config, validate_config, ConfigError, RelayConfig, RelayMode};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "goradar-relay",
    about = "Relays scanner events to the GoRadar aggregator",
    version,
    after_help = "\
EXAMPLES:
    goradar-relay --port 8080 --verbose
    goradar-relay --config /etc/goradar-relay.toml"
)]
pub struct Cli {
    /// What port the server should run on. Default: 8080
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Verbose logging enabled. Default: false
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Forward request bodies without transforming them
    #[arg(long)]
    pub passthrough: bool,
}

impl Cli {
    /// Parse process arguments, printing usage and exiting on misuse.
    ///
    /// `--help` and `--version` exit 0; anything else invalid exits 1.
    pub fn parse_or_exit() -> Self {
        match Self::parse_from_args(std::env::args_os()) {
            Ok(cli) => cli,
            Err(e) => {
                let _ = e.print();
                std::process::exit(exit_code(&e));
            }
        }
    }

    pub fn parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Build the effective configuration: file (or defaults), then flags.
    pub fn into_config(self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RelayConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if self.verbose {
            config.observability.log_level = "debug".to_string();
        }
        if self.passthrough {
            config.mode = RelayMode::Passthrough;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Process exit code for a parse failure.
pub fn exit_code(error: &clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}
