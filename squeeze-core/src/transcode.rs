//! Transcoding: invokes the encoder at the computed target bitrate.

use std::fs;
use std::path::Path;
use std::process::Command;

use log::{debug, info};
use thiserror::Error;

use crate::command::{self, CommandError};
use crate::config::WorkspaceConfig;
use crate::request::Codec;
use crate::toolchain::Toolchain;

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("encode process failed: {0}")]
    EncodeProcessFailed(String),

    #[error("encode timed out after {0} seconds")]
    TimedOut(u64),

    #[error("output file error: {0}")]
    Output(#[from] std::io::Error),
}

/// Removes any pre-existing file at the output path.
///
/// The encoder must never be asked to merge into stale output; this also
/// clears truncated files left behind by a failed prior run.
pub fn remove_stale_output(output: &Path) -> std::io::Result<()> {
    if output.exists() {
        debug!("removing stale output {}", output.display());
        fs::remove_file(output)?;
    }
    Ok(())
}

/// Re-encodes `source` into `output` at the target bitrate.
///
/// Blocks until the encoder exits. A failed run may leave a truncated file
/// at the output path; the next attempt's pre-delete clears it.
pub fn transcode(
    toolchain: &Toolchain,
    config: &WorkspaceConfig,
    source: &Path,
    output: &Path,
    codec: Codec,
    target_bitrate_bps: u64,
) -> Result<(), TranscodeError> {
    remove_stale_output(output)?;

    info!(
        "encoding {} -> {} ({}, {} b/s)",
        source.display(),
        output.display(),
        codec,
        target_bitrate_bps
    );

    // "slow" is the encoder's internal speed/quality trade-off, unrelated
    // to the user-facing quality preset.
    let mut cmd = Command::new(&toolchain.ffmpeg);
    cmd.arg("-i")
        .arg(source)
        .args(["-preset", "slow", "-hide_banner", "-c:v"])
        .arg(codec.ffmpeg_lib())
        .arg("-b:v")
        .arg(target_bitrate_bps.to_string())
        .arg(output);

    let result = command::run_command(&mut cmd, config.subprocess_timeout).map_err(|e| match e {
        CommandError::TimedOut(secs) => TranscodeError::TimedOut(secs),
        other => TranscodeError::EncodeProcessFailed(other.to_string()),
    })?;

    if !result.status.success() {
        return Err(TranscodeError::EncodeProcessFailed(format!(
            "encoder exited with {}: {}",
            result.status,
            result.stderr_text()
        )));
    }

    Ok(())
}
