//! Result reporting.
//!
//! Humans get a summary on stdout and one line per recovered failure on
//! stderr. Automation gets a single `rendered_files=<json>` line appended to
//! the file named by `GITHUB_OUTPUT`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use stencil_render::RunReport;

/// Key of the machine-readable output line.
pub const OUTPUT_KEY: &str = "rendered_files";

/// Writes `Successfully rendered N template(s)` and the written paths.
pub fn write_summary(out: &mut impl Write, report: &RunReport) -> io::Result<()> {
    writeln!(out, "Successfully rendered {} template(s)", report.written.len())?;
    for path in &report.written {
        writeln!(out, "  - {}", path.display())?;
    }
    Ok(())
}

/// Writes one `Failed to render <template>: <error>` line per recovered failure.
pub fn write_failures(err: &mut impl Write, report: &RunReport) -> io::Result<()> {
    for failure in &report.failures {
        writeln!(
            err,
            "Failed to render {}: {}",
            failure.template.display(),
            failure.error
        )?;
    }
    Ok(())
}

/// The `rendered_files=[...]` line, without a trailing newline.
pub fn output_line(written: &[PathBuf]) -> serde_json::Result<String> {
    let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
    Ok(format!("{}={}", OUTPUT_KEY, serde_json::to_string(&paths)?))
}

/// Appends the output line to `path`, creating the file if needed.
pub fn append_output(path: &Path, written: &[PathBuf]) -> anyhow::Result<()> {
    let line = output_line(written).context("failed to encode rendered file list")?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;
    writeln!(file, "{}", line)
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    Ok(())
}
