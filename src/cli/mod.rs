//! CLI module for clientedb
//!
//! Provides command-line interface for:
//! - init: Create the data directory and the `clientes` collection
//! - validate: Validate one document and print the result
//! - schema: Print the stored collection definition

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, schema, validate};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_file, read_request, write_response};
