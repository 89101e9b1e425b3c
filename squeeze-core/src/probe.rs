//! Media probing: runs the prober against a file and parses its report.
//!
//! The prober's stdout is captured into a labeled scratch artifact before
//! parsing, so the source-probe and result-probe reports of one run never
//! collide. Numeric format fields (`size`, `bit_rate`) stay text-typed as
//! the prober emits them; they are parsed to integers only where the
//! pipeline does arithmetic, and a parse failure there is malformed
//! metadata, never a silent zero.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::command::{self, CommandError};
use crate::config::WorkspaceConfig;
use crate::toolchain::Toolchain;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe process failed: {0}")]
    ProbeProcessFailed(String),

    #[error("probe timed out after {0} seconds")]
    TimedOut(u64),

    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),

    #[error("probe artifact error: {0}")]
    Artifact(#[from] std::io::Error),
}

/// Container-level format metadata reported by the prober.
///
/// Field names follow the prober's native JSON report. Immutable once
/// returned; created fresh on every probe.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaFormatInfo {
    pub filename: String,
    pub nb_streams: u32,
    pub nb_programs: u32,
    pub format_name: String,
    pub format_long_name: String,
    pub start_time: String,
    pub duration: String,
    pub size: String,
    pub bit_rate: String,
    pub probe_score: i32,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl MediaFormatInfo {
    /// Parses the container size in bytes.
    pub fn size_bytes(&self) -> Result<u64, ProbeError> {
        self.size.parse().map_err(|_| {
            ProbeError::MalformedMetadata(format!(
                "size is not a non-negative integer: {:?}",
                self.size
            ))
        })
    }

    /// Parses the container bitrate in bits per second.
    pub fn bit_rate_bps(&self) -> Result<u64, ProbeError> {
        self.bit_rate.parse().map_err(|_| {
            ProbeError::MalformedMetadata(format!(
                "bit_rate is not a non-negative integer: {:?}",
                self.bit_rate
            ))
        })
    }
}

/// Top-level shape of the prober's JSON report.
#[derive(Debug, Deserialize)]
struct ProbeReport {
    format: MediaFormatInfo,
}

/// Probes a media file, writing the raw report to `<temp>/<label>.json`.
///
/// Blocks until the prober exits. The artifact is owned by the caller and
/// overwritten on the next probe with the same label.
pub fn probe_format(
    toolchain: &Toolchain,
    config: &WorkspaceConfig,
    media_path: &Path,
    label: &str,
) -> Result<MediaFormatInfo, ProbeError> {
    let mut cmd = Command::new(&toolchain.ffprobe);
    cmd.args(["-v", "quiet", "-print_format", "json", "-show_format", "-hide_banner"])
        .arg(media_path);

    let output = command::run_command(&mut cmd, config.subprocess_timeout).map_err(|e| match e {
        CommandError::TimedOut(secs) => ProbeError::TimedOut(secs),
        other => ProbeError::ProbeProcessFailed(other.to_string()),
    })?;

    if !output.status.success() {
        return Err(ProbeError::ProbeProcessFailed(format!(
            "prober exited with {} for {}: {}",
            output.status,
            media_path.display(),
            output.stderr_text()
        )));
    }

    let artifact = config.temp_dir.join(format!("{label}.json"));
    fs::write(&artifact, &output.stdout)?;
    debug!("probe artifact written to {}", artifact.display());

    parse_artifact(&artifact)
}

/// Parses a probe artifact into [`MediaFormatInfo`].
///
/// A missing `format` object or any missing required field is malformed
/// metadata, matching the prober's contract that absent properties mean
/// the probe did not succeed.
pub fn parse_artifact(path: &Path) -> Result<MediaFormatInfo, ProbeError> {
    let raw = fs::read(path)?;
    let report: ProbeReport = serde_json::from_slice(&raw).map_err(|e| {
        ProbeError::MalformedMetadata(format!("cannot parse probe report {}: {e}", path.display()))
    })?;
    Ok(report.format)
}
