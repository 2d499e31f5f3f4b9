// # Measurement Sink Trait
//
// Defines the interface onto the Nielsen App SDK.
//
// The destination decides *whether* and *with what* to call the SDK; a sink
// only forwards. Payloads are JSON objects because that is what the SDK's
// `play`/`loadMetadata` entry points accept.
//
// ## Usage
//
// ```rust,ignore
// use dtvr_core::traits::MeasurementSink;
//
// fn start(sink: &dyn MeasurementSink, channel_info: &dtvr_core::traits::JsonObject) {
//     sink.play(channel_info);
// }
// ```

use crate::config::AppSdkConfig;
use serde_json::Value;

/// JSON object handed to the SDK
pub type JsonObject = serde_json::Map<String, Value>;

/// Trait for measurement SDK handles
///
/// Every call is fire-and-forget: the SDK is assumed to accept it instantly
/// and there is nothing for the caller to handle afterwards.
///
/// ## Allowed
/// - Forward the call to the SDK (or record it, in tests)
///
/// ## Forbidden
/// - Deciding whether a call should happen (owned by the destination)
/// - Deduplicating ID3 tags (owned by [`Id3State`](crate::id3::Id3State))
/// - Retrying or buffering calls
pub trait MeasurementSink: Send {
    /// Start or resume measurement
    ///
    /// `channel_info` is `{"channelName": ...}` or `{}`.
    fn play(&self, channel_info: &JsonObject);

    /// Stop measurement
    fn stop(&self);

    /// Load content metadata
    ///
    /// `metadata` always carries `"type": "content"`; `channelName` and
    /// `adModel` appear only when the event supplied them.
    fn load_metadata(&self, metadata: &JsonObject);

    /// Send an ID3 tag
    fn send_id3(&self, id3: &str);

    /// Get the sink name (for logging/debugging)
    fn sink_name(&self) -> &'static str;
}

/// Helper trait for initializing a sink from the SDK configuration
pub trait MeasurementSinkFactory: Send + Sync {
    /// Initialize the SDK and return a handle onto it
    ///
    /// # Parameters
    ///
    /// - `config`: `{appid, sfcode, nol_devDebug?}` built from destination settings
    ///
    /// # Returns
    ///
    /// A boxed sink, or an error if the SDK refused the configuration
    fn create(&self, config: &AppSdkConfig) -> Result<Box<dyn MeasurementSink>, crate::Error>;
}
