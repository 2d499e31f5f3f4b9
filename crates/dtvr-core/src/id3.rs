// # ID3 forwarding
//
// Some events carry an ID3 tag in one of their properties. The tag is
// forwarded to the SDK only when it differs from the last one forwarded.
//
// The check runs on every track event, whether or not the event is also a
// video lifecycle event.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::config::Id3Config;
use crate::traits::MeasurementSink;

/// Last ID3 tag forwarded to the SDK
///
/// Lives as long as the destination. Settings updates never reset it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Id3State {
    last_forwarded: String,
}

impl Id3State {
    /// Empty state: nothing forwarded yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The last forwarded tag; empty until the first one
    pub fn last_forwarded(&self) -> &str {
        &self.last_forwarded
    }

    /// Record `id3` if it is new
    ///
    /// Returns `false` (state unchanged) for an empty tag or a repeat.
    pub fn observe(&mut self, id3: &str) -> bool {
        if id3.is_empty() || id3 == self.last_forwarded {
            return false;
        }
        self.last_forwarded.clear();
        self.last_forwarded.push_str(id3);
        true
    }
}

/// Forward the event's ID3 tag if the event is an ID3 carrier and the tag changed
///
/// # Returns
///
/// `true` if `sink.send_id3` was called
pub fn maybe_forward_id3(
    event_name: &str,
    properties: &HashMap<String, String>,
    config: &Id3Config,
    state: &mut Id3State,
    sink: &dyn MeasurementSink,
) -> bool {
    if !config.is_id3_event(event_name) {
        return false;
    }

    let Some(id3) = properties.get(&config.property_key) else {
        trace!("{} carries no {} property", event_name, config.property_key);
        return false;
    };

    if !state.observe(id3) {
        trace!("Skipping unchanged ID3 tag from {}", event_name);
        return false;
    }

    debug!("{}.sendID3({})", sink.sink_name(), id3);
    sink.send_id3(id3);
    true
}
