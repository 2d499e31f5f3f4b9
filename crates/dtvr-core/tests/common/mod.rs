//! Test doubles and common utilities for destination contract tests
//!
//! The recording sink stores every SDK call in order so tests can assert on
//! the exact call sequence a track event produced.

#![allow(dead_code)]

use dtvr_core::config::{AppSdkConfig, Settings};
use dtvr_core::error::{Error, Result};
use dtvr_core::traits::{JsonObject, MeasurementSink, MeasurementSinkFactory};
use dtvr_core::{Destination, TrackEvent, UpdateType};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// One SDK call seen by the recording sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Play(Value),
    Stop,
    LoadMetadata(Value),
    SendId3(String),
}

/// A sink that records calls into a shared log
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl MeasurementSink for RecordingSink {
    fn play(&self, channel_info: &JsonObject) {
        self.record(SinkCall::Play(Value::Object(channel_info.clone())));
    }

    fn stop(&self) {
        self.record(SinkCall::Stop);
    }

    fn load_metadata(&self, metadata: &JsonObject) {
        self.record(SinkCall::LoadMetadata(Value::Object(metadata.clone())));
    }

    fn send_id3(&self, id3: &str) {
        self.record(SinkCall::SendId3(id3.to_string()));
    }

    fn sink_name(&self) -> &'static str {
        "recording"
    }
}

impl RecordingSink {
    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// A factory whose sinks share one call log
///
/// Clones share the same log and recorded configurations, so a test can
/// keep one clone while the destination owns the other.
#[derive(Clone, Default)]
pub struct RecordingSinkFactory {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    configs: Arc<Mutex<Vec<AppSdkConfig>>>,
}

impl RecordingSinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// All sink calls so far, in order
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget calls recorded so far
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Every ID3 value sent so far
    pub fn sent_id3(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::SendId3(id3) => Some(id3),
                _ => None,
            })
            .collect()
    }

    /// SDK configurations passed to `create()`
    pub fn configs(&self) -> Vec<AppSdkConfig> {
        self.configs.lock().unwrap().clone()
    }

    /// Number of times `create()` was called
    pub fn create_count(&self) -> usize {
        self.configs.lock().unwrap().len()
    }
}

impl MeasurementSinkFactory for RecordingSinkFactory {
    fn create(&self, config: &AppSdkConfig) -> Result<Box<dyn MeasurementSink>> {
        self.configs.lock().unwrap().push(config.clone());
        Ok(Box::new(RecordingSink {
            calls: Arc::clone(&self.calls),
        }))
    }
}

/// A factory that refuses every configuration
pub struct FailingSinkFactory;

impl MeasurementSinkFactory for FailingSinkFactory {
    fn create(&self, _config: &AppSdkConfig) -> Result<Box<dyn MeasurementSink>> {
        Err(Error::sink("failing", "SDK rejected configuration"))
    }
}

/// Wrap a destination entry in a host settings blob
pub fn settings_blob(entry: Value) -> Settings {
    serde_json::from_value(json!({ "integrations": { "Nielsen DTVR": entry } }))
        .expect("settings blob decodes")
}

/// The settings used by most tests
pub fn sample_settings() -> Settings {
    settings_blob(json!({
        "appId": "APPID1234567890",
        "sfCode": true,
        "debug": true,
        "sendId3Events": ["sendId3EventA", "sendId3EventB"],
        "id3Property": "id3"
    }))
}

/// A destination configured with `settings`, plus a handle onto its calls
pub fn configured_destination_with(settings: &Settings) -> (Destination, RecordingSinkFactory) {
    let factory = RecordingSinkFactory::new();
    let mut destination = Destination::new(Box::new(factory.clone()));
    destination.update(settings, UpdateType::Initial);
    assert!(destination.is_configured(), "destination should be configured");
    (destination, factory)
}

/// A destination configured with [`sample_settings`]
pub fn configured_destination() -> (Destination, RecordingSinkFactory) {
    configured_destination_with(&sample_settings())
}

/// Build a track event from a name and string properties
pub fn track_event(name: &str, properties: &[(&str, &str)]) -> TrackEvent {
    properties
        .iter()
        .fold(TrackEvent::new(name), |event, (key, value)| {
            event.with_property(*key, *value)
        })
}
