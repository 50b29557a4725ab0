//! Utility functions

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::CliError;
use crate::formats::InputFormat;

/// Path that stands for standard input or output.
pub const STDIO: &str = "-";

/// Reads a whole file, or standard input for `-`.
pub fn read_input(path: &str) -> Result<String, CliError> {
    if path == STDIO {
        let mut content = String::new();
        io::stdin().lock().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Writes `content` followed by a newline to a file, or standard output for `-`.
pub fn write_output(path: &str, content: &str) -> Result<(), CliError> {
    if path == STDIO {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", content)?;
        stdout.flush()?;
    } else {
        fs::write(path, format!("{}\n", content))?;
    }
    Ok(())
}

/// Resolves the document format: explicit choice, then extension, then content.
pub fn resolve_format(explicit: Option<InputFormat>, path: &str, content: &str) -> InputFormat {
    explicit
        .or_else(|| {
            if path == STDIO {
                None
            } else {
                InputFormat::detect_from_path(Path::new(path))
            }
        })
        .unwrap_or_else(|| InputFormat::detect_from_content(content))
}

/// Format a digit count for display
pub fn format_digits(digits: usize) -> String {
    if digits == 1 {
        "1 digit".to_string()
    } else {
        format!("{} digits", digits)
    }
}
