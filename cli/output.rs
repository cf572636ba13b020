use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use textpack_core::context::default_title;
use textpack_core::{Config, FileChangeRecord, FlatFileRecord};

use crate::cli_args::OutputTargetOpts;

/// Where a rendered artifact goes.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// `--stdout` wins, then an explicit outfile (CLI or config), then
/// `<cwd>/<cwd name>.<ext>`.
pub fn resolve_target(config: &Config, opts: &OutputTargetOpts) -> Result<OutputTarget> {
    if opts.stdout {
        return Ok(OutputTarget::Stdout);
    }
    if let Some(path) = &config.output.outfile {
        return Ok(OutputTarget::File(path.clone()));
    }
    let cwd = env::current_dir().context("Failed to read current directory")?;
    Ok(OutputTarget::File(default_outfile(
        &cwd,
        config.output.format.extension(),
    )))
}

pub fn default_outfile(cwd: &Path, extension: &str) -> PathBuf {
    cwd.join(format!("{}.{}", default_title(cwd), extension))
}

pub fn emit(content: &str, target: &OutputTarget, what: &str, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::File(path) => {
            write_to_file(path, content)?;
            if !quiet {
                println!(
                    "{} {} saved to: {}",
                    "✅".green(),
                    what,
                    path.display().to_string().blue()
                );
            }
        }
        OutputTarget::Stdout => write_to_stdout(content)?,
    }
    Ok(())
}

fn write_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    Ok(())
}

fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

// Summaries go to stderr so `--stdout` output stays clean.
pub fn print_files_table(files: &[FlatFileRecord]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("File").fg(Color::Green),
        Cell::new("Lines").fg(Color::Green),
        Cell::new("Bytes").fg(Color::Green),
    ]);
    for file in files {
        table.add_row(vec![
            Cell::new(&file.name).fg(Color::Cyan),
            Cell::new(file.content.lines().count()).set_alignment(CellAlignment::Right),
            Cell::new(file.content.len())
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkGrey),
        ]);
    }
    let total: usize = files.iter().map(|f| f.content.len()).sum();
    eprintln!("{table}");
    eprintln!(
        "{:<10} {} file(s), {} bytes",
        "Total:".green(),
        files.len().to_string().cyan(),
        total.to_string().cyan()
    );
}

pub fn print_changes_table<'a>(records: impl IntoIterator<Item = &'a FileChangeRecord>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("File").fg(Color::Green),
        Cell::new("Sections").fg(Color::Green),
        Cell::new("Removed").fg(Color::Green),
        Cell::new("Added").fg(Color::Green),
    ]);
    for record in records {
        let removed: usize = record.diff_sections.iter().map(|s| s.before.len()).sum();
        let added: usize = record.diff_sections.iter().map(|s| s.after.len()).sum();
        table.add_row(vec![
            Cell::new(&record.path).fg(Color::Cyan),
            Cell::new(record.diff_sections.len()).set_alignment(CellAlignment::Right),
            Cell::new(removed)
                .set_alignment(CellAlignment::Right)
                .fg(Color::Red),
            Cell::new(added)
                .set_alignment(CellAlignment::Right)
                .fg(Color::Green),
        ]);
    }
    eprintln!("{table}");
}
