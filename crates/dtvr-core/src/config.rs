//! Configuration types for the DTVR destination
//!
//! Settings arrive from the host as one blob keyed by destination name.
//! [`DestinationSettings`] is the entry for this destination; everything
//! else here is derived from it when the destination is first configured.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Region code used when the settings carry none
pub const DEFAULT_SF_CODE: &str = "us";

/// Property read for ID3 tags when the settings name none
pub const DEFAULT_ID3_PROPERTY: &str = "id3";

/// Value of `nol_devDebug` when debug logging is requested from the SDK
pub const DEV_DEBUG_LEVEL: &str = "DEBUG";

/// Settings blob delivered by the host pipeline
///
/// Only `integrations` is read; any other top-level keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Per-destination settings keyed by destination name
    #[serde(default)]
    pub integrations: serde_json::Map<String, Value>,
}

impl Settings {
    /// Parse a settings blob from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode the settings entry for one destination
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: the entry exists and decodes
    /// - `Ok(None)`: no entry (or a `null` entry) for `key`
    /// - `Err(Error::Settings)`: the entry exists but does not decode as `T`
    pub fn destination_settings<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.integrations.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| Error::settings(key, e.to_string())),
        }
    }

    /// Whether the blob carries an entry for `key`
    pub fn has_destination(&self, key: &str) -> bool {
        matches!(self.integrations.get(key), Some(v) if !v.is_null())
    }
}

/// Remote settings for the Nielsen DTVR destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSettings {
    /// Nielsen application id
    #[serde(deserialize_with = "lenient_string")]
    pub app_id: String,

    /// Ask the SDK for developer debug output
    #[serde(default, deserialize_with = "lenient_bool")]
    pub debug: bool,

    /// Region code; [`DEFAULT_SF_CODE`] when absent or empty
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub sf_code: Option<String>,

    /// Event names that carry ID3 tags, matched case-insensitively
    #[serde(default)]
    pub send_id3_events: Vec<String>,

    /// Property holding the ID3 tag
    #[serde(default = "default_id3_property")]
    pub id3_property: String,
}

impl DestinationSettings {
    /// Create settings with only an app id
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            debug: false,
            sf_code: None,
            send_id3_events: Vec::new(),
            id3_property: default_id3_property(),
        }
    }

    /// Set the debug flag
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the region code
    pub fn with_sf_code(mut self, sf_code: impl Into<String>) -> Self {
        self.sf_code = Some(sf_code.into());
        self
    }

    /// Set the ID3 carrying event names
    pub fn with_id3_events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send_id3_events = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ID3 property name
    pub fn with_id3_property(mut self, property: impl Into<String>) -> Self {
        self.id3_property = property.into();
        self
    }

    /// Region code with the default applied
    pub fn resolved_sf_code(&self) -> &str {
        match self.sf_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => DEFAULT_SF_CODE,
        }
    }
}

fn default_id3_property() -> String {
    DEFAULT_ID3_PROPERTY.to_string()
}

/// SDK initialization object
///
/// Field names are the ones the Nielsen App SDK expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSdkConfig {
    /// Application id
    pub appid: String,

    /// Region code
    pub sfcode: String,

    /// Present only when debug output is enabled
    #[serde(rename = "nol_devDebug", default, skip_serializing_if = "Option::is_none")]
    pub dev_debug: Option<String>,
}

impl AppSdkConfig {
    /// Build the SDK configuration from destination settings
    pub fn from_settings(settings: &DestinationSettings) -> Self {
        Self {
            appid: settings.app_id.clone(),
            sfcode: settings.resolved_sf_code().to_string(),
            dev_debug: settings.debug.then(|| DEV_DEBUG_LEVEL.to_string()),
        }
    }

    /// Pretty JSON form, used for logging
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Normalized ID3 configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Config {
    /// Lowercased event names that carry ID3 tags
    pub event_names: BTreeSet<String>,

    /// Property the tag is read from, never empty
    pub property_key: String,
}

impl Id3Config {
    /// Derive the ID3 configuration from destination settings
    pub fn from_settings(settings: &DestinationSettings) -> Self {
        let property_key = if settings.id3_property.is_empty() {
            default_id3_property()
        } else {
            settings.id3_property.clone()
        };

        Self {
            event_names: settings
                .send_id3_events
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
            property_key,
        }
    }

    /// Whether `event_name` is on the ID3 allow-list
    pub fn is_id3_event(&self, event_name: &str) -> bool {
        self.event_names.contains(&event_name.to_lowercase())
    }
}

impl Default for Id3Config {
    fn default() -> Self {
        Self {
            event_names: BTreeSet::new(),
            property_key: default_id3_property(),
        }
    }
}

/// Renders a JSON scalar as text, the way the host's lenient decoder does
fn scalar_to_string(value: Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected a string, found {other}")),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_to_string(Value::deserialize(deserializer)?).map_err(de::Error::custom)
}

fn lenient_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => scalar_to_string(value).map(Some).map_err(de::Error::custom),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(de::Error::custom(format!("expected a boolean, found {other}"))),
    }
}
