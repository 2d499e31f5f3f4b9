//! SDK payload shapes
//!
//! Payloads are built from the flattened string properties of a track event.
//! A missing property omits its field; it never fails the payload.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::traits::JsonObject;

/// Property naming the channel
pub const CHANNEL_PROPERTY: &str = "channel";

/// Load type property names, in lookup order
pub const LOAD_TYPE_PROPERTIES: [&str; 2] = ["load_type", "loadType"];

/// Load type value that selects dynamic ad insertion
pub const DYNAMIC_LOAD_TYPE: &str = "dynamic";

/// `play` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    /// Channel from the `channel` property
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
}

impl ChannelInfo {
    /// Build from flattened event properties
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        Self {
            channel_name: properties.get(CHANNEL_PROPERTY).cloned(),
        }
    }
}

/// Nielsen ad model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdModel {
    /// Linear content, ads match the broadcast
    #[serde(rename = "1")]
    Linear,
    /// Dynamic ad insertion
    #[serde(rename = "2")]
    Dynamic,
}

impl AdModel {
    /// `Dynamic` for exactly `"dynamic"`, `Linear` for anything else
    pub fn from_load_type(load_type: &str) -> Self {
        if load_type == DYNAMIC_LOAD_TYPE {
            AdModel::Dynamic
        } else {
            AdModel::Linear
        }
    }
}

/// Metadata type; content is the only kind this destination loads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataType {
    /// Program content
    #[default]
    Content,
}

/// `loadMetadata` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    /// Always [`MetadataType::Content`]
    #[serde(rename = "type")]
    pub kind: MetadataType,

    /// Channel from the `channel` property
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,

    /// Ad model from the load type, absent when the event has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_model: Option<AdModel>,
}

impl ContentMetadata {
    /// Build from flattened event properties
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        Self {
            kind: MetadataType::Content,
            channel_name: properties.get(CHANNEL_PROPERTY).cloned(),
            ad_model: resolve_load_type(properties).map(AdModel::from_load_type),
        }
    }
}

/// Find the load type property
///
/// Every name in [`LOAD_TYPE_PROPERTIES`] is checked and the last one present
/// is used, so `loadType` beats `load_type` when an event carries both.
pub fn resolve_load_type(properties: &HashMap<String, String>) -> Option<&str> {
    let mut resolved = None;
    for key in LOAD_TYPE_PROPERTIES {
        if let Some(value) = properties.get(key) {
            resolved = Some(value.as_str());
        }
    }
    resolved
}

/// Encode a payload as the JSON object the SDK takes
pub fn to_json_object<T: Serialize>(payload: &T) -> Result<JsonObject> {
    match serde_json::to_value(payload)? {
        serde_json::Value::Object(object) => Ok(object),
        other => Err(Error::payload(format!(
            "payload must encode as an object, got {other}"
        ))),
    }
}
