use clap::Parser;
use std::io;

pub mod cli;
pub mod commands;
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

use cli::{prompt_settings, render_banner, CliArgs};
use services::app::log_sink::LogCrateSink;
use services::config::{load_settings, save_settings};
use services::extractor::execute;

/// Console entry point: parse arguments, fill gaps interactively, run one
/// extraction and print its status text.
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let mut settings = load_settings(&args)?;

    if args.is_interactive() {
        let stdin = io::stdin();
        prompt_settings(&mut settings, &mut stdin.lock(), &mut io::stdout())?;
    }

    if let Some(path) = args.save_config.as_deref() {
        save_settings(&settings, path)?;
        log::info!("[Config] Saved settings to {}", path.display());
    }

    let request = settings.to_request();
    println!("{}", render_banner(&request));

    let outcome = execute(&request, &LogCrateSink::default());
    println!("{}", outcome.status_text());

    if outcome.is_error() {
        anyhow::bail!("extraction did not run");
    }
    Ok(())
}
