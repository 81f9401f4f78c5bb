//! CSV export of usage samples.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::format::{bytes_to_mb, format_date};
use crate::models::UsageSample;


pub const CSV_HEADER: &str = "Timestamp,Date,Total TX (Bytes),Total RX (Bytes),Total (MB),Period";


/// Write one row per sample, in the given order.
///
/// Timestamps are epoch milliseconds; dates are `dd/MM/yyyy` in local time.
pub fn export_csv<W: Write>(samples: &[UsageSample], mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;

    for sample in samples {
        writeln!(
            writer,
            "{},{},{},{},{:.2},{}",
            sample.timestamp.timestamp_millis(),
            format_date(&sample.timestamp.with_timezone(&Local)),
            sample.delta.tx_bytes,
            sample.delta.rx_bytes,
            bytes_to_mb(sample.total_bytes()),
            sample.period,
        )?;
    }

    writer.flush()
}


/// Write the CSV export to `path`, creating parent directories.
pub fn export_csv_file(samples: &[UsageSample], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    export_csv(samples, BufWriter::new(file))
        .with_context(|| format!("Failed to write export file: {}", path.display()))
}


/// `<home>/mobile-data-guard/data_usage_<timestamp>.csv`.
pub fn default_export_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mobile-data-guard")
        .join(format!("data_usage_{}.csv", Local::now().format("%Y%m%d_%H%M%S")))
}


/// Open file with default application.
pub fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    Ok(())
}
