//! Toolchain provisioning: ensures a working encoder/prober pair locally.
//!
//! Checks the install directory for the two executables; when either is
//! missing, downloads the platform build archive, extracts it into the
//! scratch directory, and moves the executables into place. Provisioning is
//! resumable by restart: a partial failure leaves nothing the next run
//! trusts, because the full check-download-extract-install sequence starts
//! over from the filesystem state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::config::WorkspaceConfig;

#[cfg(windows)]
pub const FFMPEG_EXE: &str = "ffmpeg.exe";
#[cfg(not(windows))]
pub const FFMPEG_EXE: &str = "ffmpeg";

#[cfg(windows)]
pub const FFPROBE_EXE: &str = "ffprobe.exe";
#[cfg(not(windows))]
pub const FFPROBE_EXE: &str = "ffprobe";

/// Release feed serving the platform build archives.
const RELEASE_BASE_URL: &str = "https://github.com/BtbN/FFmpeg-Builds/releases/download/latest";

/// Local name for the downloaded archive inside the scratch directory.
const ARCHIVE_NAME: &str = "ffmpeg.zip";

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("toolchain download failed: {0}")]
    DownloadFailed(String),

    #[error("toolchain extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("toolchain install failed: {0}")]
    InstallFailed(String),
}

/// Outcome of [`ensure_toolchain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainStatus {
    /// Both executables were already installed; nothing was touched.
    Ready,
    /// A download/install run was performed.
    Provisioned,
}

/// Absolute paths to the installed executables.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Toolchain {
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            ffmpeg: config.bin_dir.join(FFMPEG_EXE),
            ffprobe: config.bin_dir.join(FFPROBE_EXE),
        }
    }

    /// Re-examines the filesystem; no result is cached.
    pub fn is_installed(&self) -> bool {
        self.ffmpeg.is_file() && self.ffprobe.is_file()
    }
}

/// The platform-specific build to download and its layout inside the archive.
#[derive(Debug, Clone)]
struct PlatformBuild {
    archive_url: String,
    /// Top-level directory the archive extracts to; executables live in its `bin/`.
    archive_root: String,
}

fn platform_build() -> Result<PlatformBuild, ProvisionError> {
    let tag = if cfg!(all(target_os = "windows", target_arch = "x86_64")) {
        "win64"
    } else if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
        "linux64"
    } else {
        return Err(ProvisionError::UnsupportedPlatform(format!(
            "{}/{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        )));
    };

    let build = format!("ffmpeg-master-latest-{tag}-gpl");
    Ok(PlatformBuild {
        archive_url: format!("{RELEASE_BASE_URL}/{build}.zip"),
        archive_root: build,
    })
}

/// Ensures both executables are installed, provisioning them if absent.
///
/// When the toolchain is already present this performs no network access
/// and no filesystem writes.
pub fn ensure_toolchain(config: &WorkspaceConfig) -> Result<ToolchainStatus, ProvisionError> {
    let toolchain = Toolchain::new(config);
    if toolchain.is_installed() {
        debug!("toolchain present at {}", config.bin_dir.display());
        return Ok(ToolchainStatus::Ready);
    }

    info!(
        "toolchain missing from {}, provisioning",
        config.bin_dir.display()
    );
    provision(config)?;
    Ok(ToolchainStatus::Provisioned)
}

fn provision(config: &WorkspaceConfig) -> Result<(), ProvisionError> {
    let build = platform_build()?;

    fs::create_dir_all(&config.temp_dir).map_err(|e| {
        ProvisionError::DownloadFailed(format!(
            "cannot create scratch directory {}: {e}",
            config.temp_dir.display()
        ))
    })?;

    let archive_path = config.temp_dir.join(ARCHIVE_NAME);
    download_archive(&build.archive_url, &archive_path)?;

    info!("toolchain archive downloaded, extracting");
    extract_archive(&archive_path, &config.temp_dir)?;

    let extracted_root = config.temp_dir.join(&build.archive_root);
    install_executables(&extracted_root.join("bin"), config)?;

    // Scratch cleanup is best-effort; leftovers are overwritten next run.
    fs::remove_file(&archive_path).ok();
    fs::remove_dir_all(&extracted_root).ok();

    info!("toolchain installed into {}", config.bin_dir.display());
    Ok(())
}

fn download_archive(url: &str, dest: &Path) -> Result<(), ProvisionError> {
    info!("downloading toolchain archive from {url}");

    // The blocking client's default request timeout is too short for a
    // full toolchain archive; downloads wait indefinitely like the rest
    // of the pipeline.
    let client = reqwest::blocking::Client::builder()
        .timeout(None)
        .build()
        .map_err(|e| ProvisionError::DownloadFailed(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| ProvisionError::DownloadFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ProvisionError::DownloadFailed(format!(
            "HTTP {} from {url}",
            response.status()
        )));
    }

    let mut file = fs::File::create(dest).map_err(|e| {
        ProvisionError::DownloadFailed(format!("cannot write {}: {e}", dest.display()))
    })?;
    io::copy(&mut response, &mut file)
        .map_err(|e| ProvisionError::DownloadFailed(e.to_string()))?;

    Ok(())
}

fn extract_archive(archive_path: &Path, dest: &Path) -> Result<(), ProvisionError> {
    let file = fs::File::open(archive_path)
        .map_err(|e| ProvisionError::ExtractionFailed(e.to_string()))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ProvisionError::ExtractionFailed(e.to_string()))?;
    archive
        .extract(dest)
        .map_err(|e| ProvisionError::ExtractionFailed(e.to_string()))
}

/// Moves both executables from the extracted tree into the install
/// directory, replacing any prior partial install.
fn install_executables(
    extracted_bin: &Path,
    config: &WorkspaceConfig,
) -> Result<(), ProvisionError> {
    for exe in [FFMPEG_EXE, FFPROBE_EXE] {
        let source = extracted_bin.join(exe);
        if !source.is_file() {
            return Err(ProvisionError::ExtractionFailed(format!(
                "archive is missing expected path {}",
                source.display()
            )));
        }
    }

    if config.bin_dir.exists() {
        fs::remove_dir_all(&config.bin_dir).map_err(|e| {
            ProvisionError::InstallFailed(format!(
                "cannot clear install directory {}: {e}",
                config.bin_dir.display()
            ))
        })?;
    }
    fs::create_dir_all(&config.bin_dir).map_err(|e| {
        ProvisionError::InstallFailed(format!(
            "cannot create install directory {}: {e}",
            config.bin_dir.display()
        ))
    })?;

    for exe in [FFMPEG_EXE, FFPROBE_EXE] {
        fs::rename(extracted_bin.join(exe), config.bin_dir.join(exe)).map_err(|e| {
            ProvisionError::InstallFailed(format!("cannot move {exe} into place: {e}"))
        })?;
    }

    Ok(())
}
