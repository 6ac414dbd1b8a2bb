//! keyweave - event replay driver
//!
//! Loads a bindings file, feeds a line-oriented script of raw key
//! transitions through the recognition engine, and reports every recognized
//! action. The script format is one event per line:
//!
//! ```text
//! # comment
//! down q KeyQ
//! up q KeyQ
//! down Escape
//! ```
//!
//! The physical code defaults to the key name when omitted.

use std::cell::Cell;
use std::io::Read;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use keyweave::{BindingsConfig, InputDispatcher, KeyEvent};

/// Command-line arguments for keyweave
#[derive(Parser, Debug)]
#[command(name = "keyweave")]
#[command(version, about = "Replay key events through the recognition engine", long_about = None)]
struct Args {
    /// Bindings file path
    #[arg(short, long, env = "KEYWEAVE_BINDINGS")]
    bindings: String,

    /// Event script path (reads stdin when omitted)
    #[arg(short, long)]
    script: Option<String>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let config = BindingsConfig::load(&args.bindings)?;
    info!(
        bindings = config.binding_count(),
        "bindings loaded from {}", args.bindings
    );

    let recognized = Rc::new(Cell::new(0u64));
    let sink = Rc::clone(&recognized);

    let mut dispatcher = InputDispatcher::new();
    dispatcher
        .apply_bindings(&config, move |action| {
            sink.set(sink.get() + 1);
            info!(action, "action recognized");
        })
        .context("Failed to register bindings")?;

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event script: {path}"))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read event script from stdin")?;
            buffer
        }
    };

    for (index, raw) in script.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_event(line) {
            Ok(event) => dispatcher.feed(event),
            Err(reason) => warn!(line = index + 1, "skipping malformed event: {reason}"),
        }
    }

    info!(
        events = dispatcher.events_processed(),
        actions = recognized.get(),
        "replay finished"
    );
    Ok(())
}

/// Parse one script line: `down <key> [code]` or `up <key> [code]`.
fn parse_event(line: &str) -> std::result::Result<KeyEvent, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().ok_or_else(|| "empty line".to_string())?;
    let key = parts
        .next()
        .ok_or_else(|| "missing key field".to_string())?
        .to_string();
    let code = parts.next().unwrap_or(&key).to_string();
    if parts.next().is_some() {
        return Err("trailing fields".to_string());
    }

    match verb {
        "down" => Ok(KeyEvent::Down { key, code }),
        "up" => Ok(KeyEvent::Up { key, code }),
        other => Err(format!("unknown verb '{other}'")),
    }
}

fn init_logging(args: &Args) {
    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("keyweave={level},warn")));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_down_with_code() {
        assert_eq!(
            parse_event("down q KeyQ").unwrap(),
            KeyEvent::Down {
                key: "q".to_string(),
                code: "KeyQ".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_code_defaults_to_key() {
        assert_eq!(
            parse_event("up Escape").unwrap(),
            KeyEvent::Up {
                key: "Escape".to_string(),
                code: "Escape".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_event("hold q").is_err());
        assert!(parse_event("down").is_err());
        assert!(parse_event("down q KeyQ extra").is_err());
    }
}
