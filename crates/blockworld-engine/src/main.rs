//! # Block World
//!
//! Headless host for the block world sandbox.
//!
//! Reads input events (one per line) from a script file or stdin and drives
//! the world core with them:
//!
//! ```text
//! blockworld [SCRIPT] [--config PATH] [--write-config PATH]
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod input;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::Session;
use crate::config::EngineConfig;

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    script: Option<PathBuf>,
    config: Option<PathBuf>,
    write_config: Option<PathBuf>,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    parsed.config = Some(args.next().context("--config needs a path")?.into());
                },
                "--write-config" => {
                    parsed.write_config =
                        Some(args.next().context("--write-config needs a path")?.into());
                },
                flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
                _ if parsed.script.is_none() => parsed.script = Some(arg.into()),
                _ => bail!("Unexpected argument: {arg}"),
            }
        }
        Ok(parsed)
    }
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("blockworld=info".parse()?))
        .init();

    info!("Block World starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse(std::env::args().skip(1))?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.validate();

    if let Some(path) = &args.write_config {
        config
            .save_to(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        return Ok(());
    }

    let mut session = Session::new(config);
    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            session.run_script(BufReader::new(file))?;
        },
        None => session.run_script(io::stdin().lock())?,
    }

    info!(
        "Block World shutdown complete ({} blocks, {} visuals, selected '{}' showing {:?})",
        session.controller().grid().len(),
        session.scene().len(),
        session.selection().current(),
        session.preview().texture
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["session.txt", "--config", "bw.toml"]).expect("valid args");
        assert_eq!(parsed.script, Some(PathBuf::from("session.txt")));
        assert_eq!(parsed.config, Some(PathBuf::from("bw.toml")));
        assert!(parsed.write_config.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&["--config"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a.txt", "b.txt"]).is_err());
    }
}
