// # dtvr-core
//
// Core library for the Nielsen DTVR analytics destination.
//
// ## Architecture Overview
//
// The destination turns video lifecycle track events into Nielsen App SDK
// calls:
// - **VideoEvent**: the twelve video lifecycle event names, classified by exact match
// - **dispatch**: play / stop / loadMetadata decisions and payload shapes
// - **id3**: forwarding of changed ID3 tags from allow-listed events
// - **MeasurementSink**: trait onto the SDK, created by a `MeasurementSinkFactory`
// - **Destination**: the plugin the host pipeline drives (`update`, `track`)
//
// ## Design Principles
//
// 1. **Pass-through**: track events are observed, never changed or dropped
// 2. **Never fatal**: bad settings or payloads cost one sink call, not the pipeline
// 3. **Synchronous**: no tasks, no suspension points; the host serializes calls
// 4. **First settings win**: only the first `Initial` update configures the destination

pub mod config;
pub mod destination;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod id3;
pub mod payload;
pub mod traits;

// Re-export core types for convenience
pub use config::{AppSdkConfig, DestinationSettings, Id3Config, Settings};
pub use destination::{Destination, TrackOutcome, UpdateOutcome, UpdateType};
pub use dispatch::{SdkCall, VideoAction};
pub use error::{Error, Result};
pub use events::{TrackEvent, VideoEvent};
pub use id3::Id3State;
pub use traits::{JsonObject, MeasurementSink, MeasurementSinkFactory};
