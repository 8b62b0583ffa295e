//! JSON I/O handling for CLI
//!
//! - Input: single JSON document via stdin (one line) or a file
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON document from one line of stdin
pub fn read_request() -> CliResult<Value> {
    let stdin = io::stdin();
    let mut line = String::new();

    stdin.lock().read_line(&mut line)?;
    parse_input(&line)
}

/// Read a JSON document from a file
pub fn read_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_input(&content)
}

fn parse_input(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write plain text lines to stdout
pub fn write_lines(lines: &[&str]) -> CliResult<()> {
    let mut stdout = io::stdout();
    for line in lines {
        writeln!(stdout, "{}", line)?;
    }
    stdout.flush()?;

    Ok(())
}
