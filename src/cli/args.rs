//! CLI argument definitions using clap
//!
//! Commands:
//! - clientedb init --config <path>
//! - clientedb validate --config <path> [--file <path>]
//! - clientedb schema --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// clientedb - schema validation for the customer collection
#[derive(Parser, Debug)]
#[command(name = "clientedb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and the `clientes` collection
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./clientedb.json")]
        config: PathBuf,
    },

    /// Validate one JSON document against the `clientes` schema
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./clientedb.json")]
        config: PathBuf,

        /// Read the document from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the stored `clientes` collection definition
    Schema {
        /// Path to configuration file
        #[arg(long, default_value = "./clientedb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["clientedb", "init"]).unwrap();
        match cli.command {
            Command::Init { config } => assert_eq!(config, PathBuf::from("./clientedb.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_with_file() {
        let cli = Cli::try_parse_from([
            "clientedb",
            "validate",
            "--config",
            "/etc/clientedb.json",
            "--file",
            "doc.json",
        ])
        .unwrap();
        match cli.command {
            Command::Validate { config, file } => {
                assert_eq!(config, PathBuf::from("/etc/clientedb.json"));
                assert_eq!(file, Some(PathBuf::from("doc.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["clientedb", "start"]).is_err());
    }
}
