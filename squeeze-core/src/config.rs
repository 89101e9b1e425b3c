//! Workspace configuration for the compression pipeline.
//!
//! Every component takes an explicit [`WorkspaceConfig`] instead of deriving
//! paths from ambient process state. The default layout places `bin/`,
//! `temp/` and `dist/` next to the running executable.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Directory layout and process settings shared by all pipeline components.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Install directory for the provisioned encoder and prober executables.
    pub bin_dir: PathBuf,

    /// Scratch directory: downloaded archives, extracted trees, probe artifacts.
    pub temp_dir: PathBuf,

    /// Output directory for compressed files.
    pub dist_dir: PathBuf,

    /// Optional wall-clock limit applied to each probe/encode subprocess.
    /// `None` means wait indefinitely.
    pub subprocess_timeout: Option<Duration>,
}

impl WorkspaceConfig {
    /// Creates a configuration rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            bin_dir: root.join("bin"),
            temp_dir: root.join("temp"),
            dist_dir: root.join("dist"),
            subprocess_timeout: None,
        }
    }

    /// Creates the default configuration rooted at the executable's directory.
    pub fn from_exe_dir() -> CoreResult<Self> {
        let exe = env::current_exe()?;
        let dir = exe.parent().ok_or_else(|| {
            CoreError::InvalidPath(format!(
                "executable {} has no parent directory",
                exe.display()
            ))
        })?;
        Ok(Self::new(dir))
    }

    /// Creates any missing workspace directories.
    pub fn prepare(&self) -> CoreResult<()> {
        for dir in [&self.bin_dir, &self.temp_dir, &self.dist_dir] {
            if !dir.is_dir() {
                log::info!("creating workspace directory {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}
