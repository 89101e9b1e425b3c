//! Validated user input for a compression run.
//!
//! `Preset` and `Codec` parse once at the input boundary; downstream code
//! never sees raw strings. Tokens are case-sensitive exact matches.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{CoreError, CoreResult};

/// Quality/size trade-off level. Larger presets reduce the bitrate harder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    Ultra,
}

#[derive(Error, Debug)]
#[error("invalid preset {0:?} (expected one of veryLow/low/medium/high/veryHigh/ultra)")]
pub struct ParsePresetError(String);

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::VeryLow,
        Preset::Low,
        Preset::Medium,
        Preset::High,
        Preset::VeryHigh,
        Preset::Ultra,
    ];

    /// The user-facing token for this preset.
    pub fn token(self) -> &'static str {
        match self {
            Preset::VeryLow => "veryLow",
            Preset::Low => "low",
            Preset::Medium => "medium",
            Preset::High => "high",
            Preset::VeryHigh => "veryHigh",
            Preset::Ultra => "ultra",
        }
    }
}

impl FromStr for Preset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.token() == s)
            .ok_or_else(|| ParsePresetError(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Video compression standard used for the encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    H264,
    H265,
}

#[derive(Error, Debug)]
#[error("invalid codec {0:?} (expected x264 or x265)")]
pub struct ParseCodecError(String);

impl Codec {
    pub const ALL: [Codec; 2] = [Codec::H264, Codec::H265];

    /// The user-facing token for this codec.
    pub fn token(self) -> &'static str {
        match self {
            Codec::H264 => "x264",
            Codec::H265 => "x265",
        }
    }

    /// The encoder library identifier passed to ffmpeg's `-c:v`.
    pub fn ffmpeg_lib(self) -> &'static str {
        match self {
            Codec::H264 => "libx264",
            Codec::H265 => "libx265",
        }
    }
}

impl FromStr for Codec {
    type Err = ParseCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codec::ALL
            .into_iter()
            .find(|codec| codec.token() == s)
            .ok_or_else(|| ParseCodecError(s.to_string()))
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A fully validated compression request.
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub source: PathBuf,
    pub preset: Preset,
    pub codec: Codec,
}

impl CompressionRequest {
    /// Builds a request, verifying that the source names an existing regular file.
    pub fn new(source: impl Into<PathBuf>, preset: Preset, codec: Codec) -> CoreResult<Self> {
        let source = source.into();
        if !source.exists() {
            return Err(CoreError::InputNotFound(source.display().to_string()));
        }
        if !source.is_file() {
            return Err(CoreError::InvalidInput(format!(
                "{} is not a regular file",
                source.display()
            )));
        }
        Ok(Self {
            source,
            preset,
            codec,
        })
    }
}
