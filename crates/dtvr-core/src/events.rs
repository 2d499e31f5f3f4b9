//! Track events and the video lifecycle vocabulary
//!
//! [`VideoEvent`] is the closed set of event names this destination acts on.
//! Lookup is by exact display name; anything else is "not a video event".

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Video lifecycle events recognized by the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoEvent {
    PlaybackPaused,
    PlaybackResumed,
    PlaybackExited,
    PlaybackInterrupted,
    PlaybackCompleted,
    ContentStarted,
    ContentCompleted,
    PlaybackBufferStarted,
    PlaybackBufferCompleted,
    PlaybackSeekStarted,
    PlaybackSeekCompleted,
    ApplicationBackgrounded,
}

impl VideoEvent {
    /// Every variant, in declaration order
    pub const ALL: [VideoEvent; 12] = [
        VideoEvent::PlaybackPaused,
        VideoEvent::PlaybackResumed,
        VideoEvent::PlaybackExited,
        VideoEvent::PlaybackInterrupted,
        VideoEvent::PlaybackCompleted,
        VideoEvent::ContentStarted,
        VideoEvent::ContentCompleted,
        VideoEvent::PlaybackBufferStarted,
        VideoEvent::PlaybackBufferCompleted,
        VideoEvent::PlaybackSeekStarted,
        VideoEvent::PlaybackSeekCompleted,
        VideoEvent::ApplicationBackgrounded,
    ];

    /// The track event name this variant is sent under
    pub const fn display_name(self) -> &'static str {
        match self {
            VideoEvent::PlaybackPaused => "Video Playback Paused",
            VideoEvent::PlaybackResumed => "Video Playback Resumed",
            VideoEvent::PlaybackExited => "Video Playback Exited",
            VideoEvent::PlaybackInterrupted => "Video Playback Interrupted",
            VideoEvent::PlaybackCompleted => "Video Playback Completed",
            VideoEvent::ContentStarted => "Video Content Started",
            VideoEvent::ContentCompleted => "Video Content Completed",
            VideoEvent::PlaybackBufferStarted => "Video Playback Buffer Started",
            VideoEvent::PlaybackBufferCompleted => "Video Playback Buffer Completed",
            VideoEvent::PlaybackSeekStarted => "Video Playback Seek Started",
            VideoEvent::PlaybackSeekCompleted => "Video Playback Seek Completed",
            VideoEvent::ApplicationBackgrounded => "Application Backgrounded",
        }
    }

    /// Classify a track event name
    ///
    /// Exact, case-sensitive match against [`display_name`](Self::display_name).
    /// Returns `None` for every other string.
    pub fn classify(event_name: &str) -> Option<Self> {
        let event = match event_name {
            "Video Playback Paused" => VideoEvent::PlaybackPaused,
            "Video Playback Resumed" => VideoEvent::PlaybackResumed,
            "Video Playback Exited" => VideoEvent::PlaybackExited,
            "Video Playback Interrupted" => VideoEvent::PlaybackInterrupted,
            "Video Playback Completed" => VideoEvent::PlaybackCompleted,
            "Video Content Started" => VideoEvent::ContentStarted,
            "Video Content Completed" => VideoEvent::ContentCompleted,
            "Video Playback Buffer Started" => VideoEvent::PlaybackBufferStarted,
            "Video Playback Buffer Completed" => VideoEvent::PlaybackBufferCompleted,
            "Video Playback Seek Started" => VideoEvent::PlaybackSeekStarted,
            "Video Playback Seek Completed" => VideoEvent::PlaybackSeekCompleted,
            "Application Backgrounded" => VideoEvent::ApplicationBackgrounded,
            _ => return None,
        };
        Some(event)
    }

    /// Whether `event_name` is one of the video lifecycle events
    pub fn is_video_event(event_name: &str) -> bool {
        Self::classify(event_name).is_some()
    }
}

impl fmt::Display for VideoEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A track event from the host pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    /// Event name
    pub event: String,

    /// Event properties
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,

    /// Remaining envelope fields (`anonymousId`, `context`, ...), carried untouched
    #[serde(flatten)]
    pub envelope: serde_json::Map<String, Value>,
}

impl TrackEvent {
    /// Create an event with no properties
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            properties: serde_json::Map::new(),
            envelope: serde_json::Map::new(),
        }
    }

    /// Add a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Properties flattened to strings
    ///
    /// Strings are kept verbatim; numbers and booleans use their JSON text,
    /// `null` becomes `"null"`. Arrays render as `[a, b]` and objects as
    /// `{k=v}`, nested values unquoted, matching the host's collection text.
    pub fn string_properties(&self) -> HashMap<String, String> {
        self.properties
            .iter()
            .map(|(key, value)| (key.clone(), property_to_string(value)))
            .collect()
    }
}

fn property_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(property_to_string).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}={}", key, property_to_string(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        other => other.to_string(),
    }
}
