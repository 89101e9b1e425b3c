//! Core library for the Squeeze video compression orchestrator.
//!
//! Given a source video, a quality preset, and a codec, this crate
//! provisions an ffmpeg/ffprobe toolchain if absent, probes the source,
//! derives a target bitrate from the preset, re-encodes, probes the result,
//! and reports the achieved size reduction.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use squeeze_core::{Codec, CompressionRequest, Preset, WorkspaceConfig, run_pipeline};
//!
//! let config = WorkspaceConfig::new("/var/lib/squeeze");
//! config.prepare().unwrap();
//!
//! let request = CompressionRequest::new(
//!     "/videos/clip.mp4",
//!     "medium".parse::<Preset>().unwrap(),
//!     "x264".parse::<Codec>().unwrap(),
//! )
//! .unwrap();
//!
//! let report = run_pipeline(&config, &request).unwrap();
//! println!("saved {:.2}%", report.ratio_percent);
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod probe;
pub mod request;
pub mod toolchain;
pub mod transcode;
pub mod utils;

// Re-exports for the public API
pub use config::WorkspaceConfig;
pub use error::{CoreError, CoreResult};
pub use pipeline::{CompressionReport, PipelineError, Stage, run_pipeline};
pub use policy::target_bitrate;
pub use probe::MediaFormatInfo;
pub use request::{Codec, CompressionRequest, Preset};
pub use toolchain::{Toolchain, ToolchainStatus, ensure_toolchain};
pub use utils::format_bytes;
