//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

use h2vqe_core::VqeConfig;

/// Return the default configuration file path (~/.h2vqe/config.yaml).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".h2vqe").join("config.yaml"))
}

/// Load the configuration.
///
/// An explicit path (from `--config` or `$H2VQE_CONFIG`) must exist. The
/// default location is used only when present; otherwise defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<VqeConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => {
                debug!("no config file, using defaults");
                return Ok(VqeConfig::default());
            }
        },
    };

    debug!(path = %path.display(), "loading config");
    VqeConfig::from_file(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Warn about bond lengths without physical meaning. The run still proceeds.
pub fn check_bond_length(bond_length: f64) {
    if bond_length <= 0.0 {
        warn!(bond_length, "non-positive bond length has no physical meaning");
        println!(
            "{} Bond length {} Å is not physical; continuing anyway",
            style("!").yellow().bold(),
            bond_length
        );
    }
}

/// Write a value as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    print_success(&format!("Exported to {}", style(path.display()).cyan()));
    Ok(())
}

/// Create a progress bar for optimization runs.
pub fn create_progress_bar(len: u64, message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Create a spinner for work of unknown length.
pub fn create_spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}

/// Print a command header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
}

/// Print a section title.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Indices of at most `max_rows` entries spread evenly over `len`, always
/// including the last one.
pub fn sample_indices(len: usize, max_rows: usize) -> Vec<usize> {
    if len == 0 || max_rows == 0 {
        return Vec::new();
    }
    if len <= max_rows {
        return (0..len).collect();
    }
    let stride = len.div_ceil(max_rows);
    let mut indices: Vec<usize> = (0..len).step_by(stride).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}
