//! Replay track events through the DTVR destination
//!
//! Reads a settings blob and newline-delimited JSON track events, runs them
//! through a [`Destination`] backed by a sink that logs each SDK call, and
//! prints a summary.
//!
//! ## Configuration
//!
//! - `DTVR_SETTINGS_PATH`: settings blob (`{"integrations": {"Nielsen DTVR": {...}}}`), required
//! - `DTVR_EVENTS_PATH`: events file, one JSON track event per line (default: stdin)
//! - `DTVR_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//!
//! ## Example
//!
//! ```bash
//! export DTVR_SETTINGS_PATH=settings.json
//! echo '{"event":"Video Content Started","properties":{"channel":"A"}}' | replay
//! ```

use anyhow::{Context, Result};
use dtvr_core::config::{AppSdkConfig, Settings};
use dtvr_core::traits::{JsonObject, MeasurementSink, MeasurementSinkFactory};
use dtvr_core::{Destination, TrackEvent, UpdateOutcome, UpdateType};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes, same convention as the other workspace binaries
#[derive(Debug, Clone, Copy)]
enum ReplayExitCode {
    /// All events replayed
    Clean = 0,
    /// Configuration or startup error
    ConfigError = 1,
    /// Failure while replaying
    RuntimeError = 2,
}

impl From<ReplayExitCode> for ExitCode {
    fn from(code: ReplayExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

struct Config {
    settings_path: String,
    events_path: Option<String>,
    log_level: String,
}

impl Config {
    fn from_env() -> Result<Self> {
        Ok(Self {
            settings_path: env::var("DTVR_SETTINGS_PATH")
                .context("DTVR_SETTINGS_PATH is required")?,
            events_path: env::var("DTVR_EVENTS_PATH").ok(),
            log_level: env::var("DTVR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            other => anyhow::bail!(
                "DTVR_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        }
    }
}

/// Sink that logs every SDK call and counts them by name
struct TracingSink {
    counts: Arc<Mutex<BTreeMap<&'static str, usize>>>,
}

impl TracingSink {
    fn count(&self, call: &'static str) {
        if let Ok(mut counts) = self.counts.lock() {
            *counts.entry(call).or_default() += 1;
        }
    }
}

impl MeasurementSink for TracingSink {
    fn play(&self, channel_info: &JsonObject) {
        info!("play({})", serde_json::Value::Object(channel_info.clone()));
        self.count("play");
    }

    fn stop(&self) {
        info!("stop()");
        self.count("stop");
    }

    fn load_metadata(&self, metadata: &JsonObject) {
        info!("loadMetadata({})", serde_json::Value::Object(metadata.clone()));
        self.count("loadMetadata");
    }

    fn send_id3(&self, id3: &str) {
        info!("sendID3({})", id3);
        self.count("sendID3");
    }

    fn sink_name(&self) -> &'static str {
        "tracing"
    }
}

#[derive(Default)]
struct TracingSinkFactory {
    counts: Arc<Mutex<BTreeMap<&'static str, usize>>>,
}

impl MeasurementSinkFactory for TracingSinkFactory {
    fn create(&self, config: &AppSdkConfig) -> dtvr_core::Result<Box<dyn MeasurementSink>> {
        info!("Initializing SDK for app {} (region {})", config.appid, config.sfcode);
        Ok(Box::new(TracingSink {
            counts: Arc::clone(&self.counts),
        }))
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ReplayExitCode::ConfigError.into();
        }
    };

    let log_level = match config.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return ReplayExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ReplayExitCode::ConfigError.into();
    }

    let counts = Arc::new(Mutex::new(BTreeMap::new()));
    let factory = TracingSinkFactory {
        counts: Arc::clone(&counts),
    };
    let mut destination = Destination::new(Box::new(factory));

    let settings = match load_settings(&config.settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {:#}", e);
            return ReplayExitCode::ConfigError.into();
        }
    };

    match destination.update(&settings, UpdateType::Initial) {
        UpdateOutcome::Configured => info!("Destination configured"),
        other => warn!("Destination not configured ({:?}), events will pass through", other),
    }

    let replayed = match replay(&mut destination, config.events_path.as_deref()) {
        Ok(n) => n,
        Err(e) => {
            error!("Replay failed: {:#}", e);
            return ReplayExitCode::RuntimeError.into();
        }
    };

    println!("replayed {} event(s)", replayed);
    if let Ok(counts) = counts.lock() {
        for (call, n) in counts.iter() {
            println!("{:>14}: {}", call, n);
        }
    }

    ReplayExitCode::Clean.into()
}

fn load_settings(path: &str) -> Result<Settings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path))?;
    Settings::from_json(&json).with_context(|| format!("parsing settings from {}", path))
}

/// Replay every event line; returns the number of events replayed
fn replay(destination: &mut Destination, events_path: Option<&str>) -> Result<usize> {
    let reader: Box<dyn BufRead> = match events_path {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut replayed = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("reading event line")?;
        if line.trim().is_empty() {
            continue;
        }

        let event: TrackEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping line {}: {}", index + 1, e);
                continue;
            }
        };

        destination.track(event);
        replayed += 1;
    }

    Ok(replayed)
}
