// squeeze-cli/src/cli.rs
//
// Defines the command-line argument structure using clap. The three
// pipeline inputs (source, preset, codec) are read interactively; the
// flags here only shape the workspace the pipeline runs in.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Squeeze: video compression tool",
    long_about = "Compresses a video file to a preset-derived bitrate using an \
                  auto-provisioned ffmpeg toolchain. Prompts for the source file, \
                  quality preset, and codec."
)]
pub struct Cli {
    /// Workspace root holding bin/, temp/ and dist/ (defaults to the executable's directory)
    #[arg(long, value_name = "DIR", env = "SQUEEZE_WORKSPACE")]
    pub workspace_dir: Option<PathBuf>,

    /// Per-subprocess timeout in seconds for probe and encode runs (default: none)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}
