//! The end-to-end compression pipeline.
//!
//! A strictly linear, synchronous sequence: validate → provision toolchain →
//! probe source → encode → probe result → report. Every stage failure is
//! terminal for the run and carries the stage name for diagnosis; nothing
//! is retried automatically.

use std::fmt;
use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::config::WorkspaceConfig;
use crate::error::CoreError;
use crate::policy;
use crate::probe::{self, ProbeError};
use crate::request::CompressionRequest;
use crate::toolchain::{self, ProvisionError, Toolchain, ToolchainStatus};
use crate::transcode;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Provisioning,
    ProbingSource,
    Encoding,
    ProbingResult,
    Reporting,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::Provisioning => "provisioning",
            Stage::ProbingSource => "probing source",
            Stage::Encoding => "encoding",
            Stage::ProbingResult => "probing result",
            Stage::Reporting => "reporting",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A terminal pipeline failure, labeled with the stage that produced it.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: CoreError,
}

impl PipelineError {
    fn new(stage: Stage, source: impl Into<CoreError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Result of a successful compression run.
#[derive(Debug, Clone)]
pub struct CompressionReport {
    pub original_size: u64,
    pub new_size: u64,
    /// Size reduction relative to the NEW size, so values above 100 are
    /// common for strong compressions. Rounded to two decimal places.
    pub ratio_percent: f64,
    pub output_path: PathBuf,
}

/// Computes the size-reduction percentage relative to the new size,
/// rounded to two decimal places.
pub fn compression_ratio(original_size: u64, new_size: u64) -> f64 {
    let ratio = (original_size as f64 - new_size as f64) / new_size as f64 * 100.0;
    (ratio * 100.0).round() / 100.0
}

/// Runs the full compression pipeline for one request.
pub fn run_pipeline(
    config: &WorkspaceConfig,
    request: &CompressionRequest,
) -> Result<CompressionReport, PipelineError> {
    // Validating: a failure here is a user-input error, not a system fault.
    if !request.source.is_file() {
        return Err(PipelineError::new(
            Stage::Validating,
            CoreError::InputNotFound(request.source.display().to_string()),
        ));
    }
    let file_name = request
        .source
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            PipelineError::new(
                Stage::Validating,
                CoreError::InvalidPath(format!(
                    "source {} has no usable file name",
                    request.source.display()
                )),
            )
        })?;

    // Provisioning. After an install run, re-check readiness once in the
    // same run instead of restarting the whole program.
    let status = toolchain::ensure_toolchain(config)
        .map_err(|e| PipelineError::new(Stage::Provisioning, e))?;
    let chain = Toolchain::new(config);
    if status == ToolchainStatus::Provisioned {
        info!("toolchain provisioned, re-checking before continuing");
        if !chain.is_installed() {
            return Err(PipelineError::new(
                Stage::Provisioning,
                ProvisionError::InstallFailed(
                    "toolchain still missing after provisioning".to_string(),
                ),
            ));
        }
    }

    // Probing the source.
    info!("probing source {}", request.source.display());
    let source_info = probe::probe_format(
        &chain,
        config,
        &request.source,
        &format!("source-metadata-{file_name}"),
    )
    .map_err(|e| PipelineError::new(Stage::ProbingSource, e))?;

    // Encoding at the preset-derived bitrate.
    let original_bitrate = source_info
        .bit_rate_bps()
        .map_err(|e| PipelineError::new(Stage::Encoding, e))?;
    let target_bitrate = policy::target_bitrate(original_bitrate, request.preset);
    let output_path = config.dist_dir.join(&file_name);
    transcode::transcode(
        &chain,
        config,
        &request.source,
        &output_path,
        request.codec,
        target_bitrate,
    )
    .map_err(|e| PipelineError::new(Stage::Encoding, e))?;

    // Probing the result.
    info!("probing result {}", output_path.display());
    let result_info = probe::probe_format(
        &chain,
        config,
        &output_path,
        &format!("result-metadata-{file_name}"),
    )
    .map_err(|e| PipelineError::new(Stage::ProbingResult, e))?;

    // Reporting.
    let original_size = source_info
        .size_bytes()
        .map_err(|e| PipelineError::new(Stage::Reporting, e))?;
    let new_size = result_info
        .size_bytes()
        .map_err(|e| PipelineError::new(Stage::Reporting, e))?;
    if new_size == 0 {
        return Err(PipelineError::new(
            Stage::Reporting,
            ProbeError::MalformedMetadata("result probe reports zero size".to_string()),
        ));
    }

    let report = CompressionReport {
        original_size,
        new_size,
        ratio_percent: compression_ratio(original_size, new_size),
        output_path,
    };
    info!(
        "compression finished: {} -> {} bytes ({:.2}%)",
        report.original_size, report.new_size, report.ratio_percent
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Codec, Preset};

    #[test]
    fn ratio_is_relative_to_new_size() {
        // 30M saved over a 20M result: 150%, not 60%.
        assert_eq!(compression_ratio(50_000_000, 20_000_000), 150.00);
    }

    #[test]
    fn ratio_rounds_to_two_decimals() {
        // 700 / 300 * 100 = 233.333..
        assert_eq!(compression_ratio(1_000, 300), 233.33);
        // 200 / 600 * 100 = 33.333..
        assert_eq!(compression_ratio(800, 600), 33.33);
    }

    #[test]
    fn ratio_is_negative_when_output_grew() {
        assert_eq!(compression_ratio(300, 400), -25.00);
    }

    #[test]
    fn ratio_is_zero_for_equal_sizes() {
        assert_eq!(compression_ratio(1_234, 1_234), 0.00);
    }

    #[test]
    fn stage_names_read_naturally() {
        assert_eq!(Stage::ProbingSource.to_string(), "probing source");
        assert_eq!(Stage::Encoding.to_string(), "encoding");
    }

    #[test]
    fn missing_source_fails_in_validating() {
        let config = WorkspaceConfig::new("/nonexistent/workspace");
        // Bypass the request constructor's check to exercise the pipeline's own.
        let request = CompressionRequest {
            source: "/no/such/clip.mp4".into(),
            preset: Preset::Medium,
            codec: Codec::H264,
        };

        let err = run_pipeline(&config, &request).unwrap_err();
        assert_eq!(err.stage, Stage::Validating);
        assert!(matches!(err.source, CoreError::InputNotFound(_)));
    }
}
