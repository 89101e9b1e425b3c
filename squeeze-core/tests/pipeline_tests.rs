//! End-to-end pipeline tests against a scripted fake toolchain.
//!
//! The fake prober/encoder are small shell scripts installed into a
//! temporary workspace, so the full stage sequence runs without a real
//! ffmpeg build or network access.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use squeeze_core::error::CoreError;
use squeeze_core::probe::ProbeError;
use squeeze_core::toolchain::{FFMPEG_EXE, FFPROBE_EXE};
use squeeze_core::transcode::TranscodeError;
use squeeze_core::{Codec, CompressionRequest, Preset, Stage, WorkspaceConfig, run_pipeline};
use tempfile::{TempDir, tempdir};

/// A prober that reports 50 MB for the source and 20 MB for anything in
/// dist/, matching a clean 150% reduction.
const FAKE_FFPROBE: &str = r#"#!/bin/sh
for a; do last="$a"; done
case "$last" in
  */dist/*) size=20000000 ;;
  *) size=50000000 ;;
esac
cat <<EOF
{"format": {"filename": "$last", "nb_streams": 1, "nb_programs": 0,
 "format_name": "mov,mp4,m4a,3gp,3g2,mj2", "format_long_name": "QuickTime / MOV",
 "start_time": "0.000000", "duration": "30.5", "size": "$size",
 "bit_rate": "1000000", "probe_score": 100, "tags": {}}}
EOF
"#;

/// An encoder that records its arguments and appends to its output path,
/// so a missed pre-delete would show up in the file contents.
const FAKE_FFMPEG: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$(dirname "$0")/ffmpeg-args"
for a; do last="$a"; done
printf 'encoded' >> "$last"
"#;

fn write_script(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

fn workspace_with_toolchain(ffprobe: &str, ffmpeg: &str) -> (TempDir, WorkspaceConfig) {
    let dir = tempdir().unwrap();
    let config = WorkspaceConfig::new(dir.path());
    config.prepare().unwrap();
    write_script(&config.bin_dir.join(FFPROBE_EXE), ffprobe);
    write_script(&config.bin_dir.join(FFMPEG_EXE), ffmpeg);
    (dir, config)
}

fn request_for(dir: &TempDir) -> CompressionRequest {
    let source = dir.path().join("clip.mp4");
    fs::write(&source, b"raw video bytes").unwrap();
    CompressionRequest::new(source, Preset::Medium, Codec::H264).unwrap()
}

#[test]
fn full_pipeline_reports_size_reduction() {
    let (dir, config) = workspace_with_toolchain(FAKE_FFPROBE, FAKE_FFMPEG);
    let request = request_for(&dir);

    let report = run_pipeline(&config, &request).unwrap();

    assert_eq!(report.original_size, 50_000_000);
    assert_eq!(report.new_size, 20_000_000);
    assert_eq!(report.ratio_percent, 150.00);
    assert_eq!(report.output_path, config.dist_dir.join("clip.mp4"));
    assert_eq!(fs::read_to_string(&report.output_path).unwrap(), "encoded");

    // Both probe artifacts landed under distinct labels.
    assert!(config.temp_dir.join("source-metadata-clip.mp4.json").is_file());
    assert!(config.temp_dir.join("result-metadata-clip.mp4.json").is_file());

    // The encoder saw the policy-derived bitrate (1_000_000 / 2.4) and the
    // fixed speed preset.
    let recorded = fs::read_to_string(config.bin_dir.join("ffmpeg-args")).unwrap();
    let args: Vec<&str> = recorded.lines().collect();
    assert!(args.windows(2).any(|w| w == ["-b:v", "416666"]));
    assert!(args.windows(2).any(|w| w == ["-c:v", "libx264"]));
    assert!(args.windows(2).any(|w| w == ["-preset", "slow"]));
}

#[test]
fn stale_dist_output_is_replaced_not_appended() {
    let (dir, config) = workspace_with_toolchain(FAKE_FFPROBE, FAKE_FFMPEG);
    let request = request_for(&dir);

    fs::write(config.dist_dir.join("clip.mp4"), b"stale leftovers").unwrap();

    let report = run_pipeline(&config, &request).unwrap();

    // The appending fake encoder would have kept "stale leftovers" if the
    // pre-delete had not run.
    assert_eq!(fs::read_to_string(&report.output_path).unwrap(), "encoded");
}

#[test]
fn failing_prober_stops_before_encoding() {
    let failing_probe = "#!/bin/sh\nexit 1\n";
    // Leave a marker if the encoder is ever invoked.
    let marker_ffmpeg = "#!/bin/sh\n: > \"$(dirname \"$0\")/encoder-ran\"\n";
    let (dir, config) = workspace_with_toolchain(failing_probe, marker_ffmpeg);
    let request = request_for(&dir);

    let err = run_pipeline(&config, &request).unwrap_err();

    assert_eq!(err.stage, Stage::ProbingSource);
    assert!(matches!(
        err.source,
        CoreError::Probe(ProbeError::ProbeProcessFailed(_))
    ));
    assert!(!config.bin_dir.join("encoder-ran").exists());
    assert!(!config.dist_dir.join("clip.mp4").exists());
}

#[test]
fn failing_encoder_surfaces_its_diagnostics() {
    let failing_ffmpeg = "#!/bin/sh\necho 'codec exploded' >&2\nexit 1\n";
    let (dir, config) = workspace_with_toolchain(FAKE_FFPROBE, failing_ffmpeg);
    let request = request_for(&dir);

    let err = run_pipeline(&config, &request).unwrap_err();

    assert_eq!(err.stage, Stage::Encoding);
    match err.source {
        CoreError::Transcode(TranscodeError::EncodeProcessFailed(msg)) => {
            assert!(msg.contains("codec exploded"), "missing diagnostics: {msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn garbage_probe_output_is_malformed_metadata() {
    let garbage_probe = "#!/bin/sh\necho 'not json'\n";
    let (dir, config) = workspace_with_toolchain(garbage_probe, FAKE_FFMPEG);
    let request = request_for(&dir);

    let err = run_pipeline(&config, &request).unwrap_err();

    assert_eq!(err.stage, Stage::ProbingSource);
    assert!(matches!(
        err.source,
        CoreError::Probe(ProbeError::MalformedMetadata(_))
    ));
}
