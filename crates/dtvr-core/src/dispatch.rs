//! Video event dispatch
//!
//! Maps a classified [`VideoEvent`] to SDK calls:
//!
//! | Event | Calls |
//! |---|---|
//! | `ContentStarted` | `play`, then `loadMetadata` |
//! | `PlaybackResumed`, `PlaybackSeekCompleted`, `PlaybackBufferCompleted` | `play` |
//! | every other video event | `stop` |
//!
//! A payload that fails to encode skips that one call; the failure is logged
//! and the call is left out of what [`dispatch`] reports.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::Result;
use crate::events::VideoEvent;
use crate::payload::{self, ChannelInfo, ContentMetadata};
use crate::traits::{JsonObject, MeasurementSink};

/// What a video event asks of the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoAction {
    /// `play` followed by `loadMetadata`
    PlayAndLoadMetadata,
    /// `play`
    Play,
    /// `stop`
    Stop,
}

/// Look up the action for a video event
pub fn action_for(event: VideoEvent) -> VideoAction {
    match event {
        VideoEvent::ContentStarted => VideoAction::PlayAndLoadMetadata,

        VideoEvent::PlaybackResumed
        | VideoEvent::PlaybackSeekCompleted
        | VideoEvent::PlaybackBufferCompleted => VideoAction::Play,

        // Completed and Exited map to stop: DTVR has no end call
        VideoEvent::PlaybackPaused
        | VideoEvent::PlaybackInterrupted
        | VideoEvent::ContentCompleted
        | VideoEvent::PlaybackBufferStarted
        | VideoEvent::PlaybackSeekStarted
        | VideoEvent::PlaybackExited
        | VideoEvent::PlaybackCompleted
        | VideoEvent::ApplicationBackgrounded => VideoAction::Stop,
    }
}

/// A video call issued to the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkCall {
    /// `play`
    Play,
    /// `loadMetadata`
    LoadMetadata,
    /// `stop`
    Stop,
}

/// Issue the SDK calls for a video event
///
/// # Parameters
///
/// - `event`: the classified event
/// - `properties`: the event's properties, flattened to strings
/// - `sink`: SDK handle
///
/// # Returns
///
/// The calls actually made, in order. A call whose payload failed to encode
/// is absent.
pub fn dispatch(
    event: VideoEvent,
    properties: &HashMap<String, String>,
    sink: &dyn MeasurementSink,
) -> Vec<SdkCall> {
    let action = action_for(event);
    debug!("{} -> {:?}", event, action);

    let mut calls = Vec::with_capacity(2);
    match action {
        VideoAction::PlayAndLoadMetadata => {
            calls.extend(play(encode_channel_info(properties), sink));
            calls.extend(load_metadata(encode_metadata(properties), sink));
        }
        VideoAction::Play => calls.extend(play(encode_channel_info(properties), sink)),
        VideoAction::Stop => calls.push(stop(sink)),
    }
    calls
}

fn encode_channel_info(properties: &HashMap<String, String>) -> Result<JsonObject> {
    payload::to_json_object(&ChannelInfo::from_properties(properties))
}

fn encode_metadata(properties: &HashMap<String, String>) -> Result<JsonObject> {
    payload::to_json_object(&ContentMetadata::from_properties(properties))
}

fn play(channel_info: Result<JsonObject>, sink: &dyn MeasurementSink) -> Option<SdkCall> {
    let channel_info = match channel_info {
        Ok(object) => object,
        Err(e) => {
            warn!("Failed to send play event: {}", e);
            return None;
        }
    };

    debug!("{}.play({:?})", sink.sink_name(), channel_info);
    sink.play(&channel_info);
    Some(SdkCall::Play)
}

fn load_metadata(metadata: Result<JsonObject>, sink: &dyn MeasurementSink) -> Option<SdkCall> {
    let metadata = match metadata {
        Ok(object) => object,
        Err(e) => {
            warn!("Failed to send loadMetadata event: {}", e);
            return None;
        }
    };

    debug!("{}.loadMetadata({:?})", sink.sink_name(), metadata);
    sink.load_metadata(&metadata);
    Some(SdkCall::LoadMetadata)
}

fn stop(sink: &dyn MeasurementSink) -> SdkCall {
    debug!("{}.stop()", sink.sink_name());
    sink.stop();
    SdkCall::Stop
}
