//! GitHub Actions step outputs and workflow commands

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const DELIMITER: &str = "TRIAGE_EOF";

/// Write one `name=value` output, using the heredoc form for multiline values
pub fn write_output(w: &mut impl Write, name: &str, value: &str) -> io::Result<()> {
    if value.contains('\n') || value.contains('\r') {
        writeln!(w, "{name}<<{DELIMITER}")?;
        writeln!(w, "{value}")?;
        writeln!(w, "{DELIMITER}")
    } else {
        writeln!(w, "{name}={value}")
    }
}

/// Append an output to the `$GITHUB_OUTPUT` file
pub fn append_output(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    write_output(&mut file, name, value)
}

/// Format an `::error::` workflow command, which fails the step visibly
pub fn error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
