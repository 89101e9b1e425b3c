//! Interactive prompts for the three pipeline inputs.
//!
//! Each prompt validates immediately; invalid input aborts the run rather
//! than re-prompting, matching the countdown-then-exit contract.

use std::path::PathBuf;

use anyhow::{Result, bail};
use console::Term;
use squeeze_core::{Codec, CompressionRequest, Preset};

fn ask(term: &Term, prompt: &str) -> Result<String> {
    term.write_str(prompt)?;
    Ok(term.read_line()?.trim().to_string())
}

/// Collects and validates source path, preset, and codec.
pub fn prompt_request(term: &Term) -> Result<CompressionRequest> {
    let raw = ask(term, "\nPlease enter the path of the file to be compressed: ")?;
    if raw.is_empty() {
        bail!("no source file given");
    }
    let source = PathBuf::from(raw);
    if !source.is_file() {
        bail!("this file does not exist: {}", source.display());
    }

    let preset_tokens = Preset::ALL.map(Preset::token).join("/");
    let raw = ask(
        term,
        &format!("\nPlease enter the compression preset (only {preset_tokens}): "),
    )?;
    let preset: Preset = raw.parse()?;

    let codec_tokens = Codec::ALL.map(Codec::token).join("/");
    let raw = ask(
        term,
        &format!("\nPlease enter the compression codec (only {codec_tokens}): "),
    )?;
    let codec: Codec = raw.parse()?;

    Ok(CompressionRequest::new(source, preset, codec)?)
}
