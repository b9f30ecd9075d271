use std::io::{self, Write};
use std::path::Path;

use crate::export::ExportSummary;

pub const USAGE: &str = "Usage: issue-export [export] [--config <path>]

Exports all open and closed issues of the configured GitHub repository to CSV.
Configuration is read from .issue-export/config.json unless --config is given.
The password may be supplied through the ISSUE_EXPORT_PASSWORD environment variable.";

/// Line reported after a completed export.
pub fn export_summary(summary: &ExportSummary, output: &Path) -> String {
    format!(
        "Exported {} open and {} closed issues to {}",
        summary.open,
        summary.closed,
        output.display()
    )
}

/// Line reported for arguments the parser did not accept.
pub fn invalid_command(description: &str) -> String {
    format!("Invalid command or arguments: {description}. Use --help for usage.")
}

/// Writes `message` to stdout and, when a capture writer is given, to it as well.
///
/// A failed stdout write is only logged; a failed capture write is returned.
pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{message}").and_then(|()| handle.flush()) {
        tracing::warn!(error = %e, "failed to write to stdout");
    }

    if let Some(w) = writer.as_deref_mut() {
        writeln!(w, "{message}")?;
    }

    Ok(())
}
