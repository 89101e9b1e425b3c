// squeeze-cli/src/main.rs
//
// Entry point for the squeeze binary: parses the workspace flags, prompts
// for the compression request, runs the core pipeline, and prints the
// size-reduction summary. Any failure is reported with its stage context,
// followed by a short countdown so the message can be read before exit.

mod cli;
mod prompts;
mod terminal;

use std::process;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use console::Term;
use squeeze_core::{WorkspaceConfig, format_bytes, run_pipeline};

const EXIT_DELAY_SECS: u64 = 5;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Cli::parse();
    match run(args) {
        Ok(()) => process::exit(0),
        Err(e) => {
            terminal::error(&format!("{e:#}"));
            countdown();
            process::exit(1);
        }
    }
}

fn run(args: cli::Cli) -> Result<()> {
    let mut config = match args.workspace_dir {
        Some(dir) => WorkspaceConfig::new(dir),
        None => WorkspaceConfig::from_exe_dir()?,
    };
    config.subprocess_timeout = args.timeout.map(Duration::from_secs);
    config.prepare()?;
    log::debug!(
        "workspace ready: bin={} temp={} dist={}",
        config.bin_dir.display(),
        config.temp_dir.display(),
        config.dist_dir.display()
    );

    let term = Term::stdout();
    let request = prompts::prompt_request(&term)?;

    terminal::status("Compressing...");
    terminal::status("At the end of the process, you can find the compressed file in the dist folder.");

    let report = run_pipeline(&config, &request)?;

    terminal::success("Finished!");
    terminal::detail("Old size", &format_bytes(report.original_size));
    terminal::detail("New size", &format_bytes(report.new_size));
    terminal::detail("Compression ratio", &format!("%{:.2}", report.ratio_percent));
    terminal::detail("Output", &report.output_path.display().to_string());
    Ok(())
}

fn countdown() {
    terminal::status(&format!(
        "The program will close automatically in {EXIT_DELAY_SECS} seconds."
    ));
    thread::sleep(Duration::from_secs(EXIT_DELAY_SECS));
}
