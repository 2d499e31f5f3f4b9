//! Nielsen DTVR destination
//!
//! The destination is the plugin the host pipeline talks to:
//! - [`Destination::update`] applies the settings blob
//! - [`Destination::track`] observes each track event and passes it on
//!
//! ## Event Flow
//!
//! ```text
//!              TrackEvent
//!                  │
//!                  ▼
//!         ┌─────────────────┐
//!         │   Destination   │──── TrackEvent (unchanged) ───▶ host
//!         └─────────────────┘
//!             │         │
//!  classify + dispatch  ID3 allow-list check
//!             │         │
//!             ▼         ▼
//!         ┌─────────────────┐
//!         │ MeasurementSink │  play / stop / loadMetadata / sendID3
//!         └─────────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! Two states: unconfigured and configured. Only an
//! [`UpdateType::Initial`] update carrying settings for [`Destination::KEY`]
//! moves the destination to configured, initializing the sink on the way.
//! Every later update is accepted and logged but changes nothing, so
//! settings are never refreshed after the first load.
//!
//! Until configured, the destination is dormant: events pass through and no
//! sink call is made.

use tracing::{debug, info, trace, warn};

use crate::config::{AppSdkConfig, DestinationSettings, Id3Config, Settings};
use crate::dispatch::{self, SdkCall, VideoAction};
use crate::error::{Error, Result};
use crate::events::{TrackEvent, VideoEvent};
use crate::id3::{self, Id3State};
use crate::traits::{MeasurementSink, MeasurementSinkFactory};

/// Kind of settings update delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateType {
    /// First settings delivery after the plugin is added
    Initial,
    /// Any later delivery
    Refresh,
}

/// Result of a settings update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The destination moved to configured
    Configured,
    /// The update was not `Initial` and was ignored
    IgnoredUpdateType,
    /// The destination was already configured; the update was ignored
    AlreadyConfigured,
    /// No settings for this destination; still dormant
    NoSettings,
    /// Settings were present but setup failed; still dormant
    SetupFailed {
        /// Why setup failed
        error: String,
    },
}

/// What a track event caused
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackOutcome {
    /// Video action the event mapped to, if it was a video event
    pub action: Option<VideoAction>,
    /// Video calls actually issued to the sink, in order
    pub calls: Vec<SdkCall>,
    /// Whether an ID3 tag was forwarded
    pub id3_forwarded: bool,
}

impl TrackOutcome {
    /// Whether the event produced any sink call
    pub fn is_noop(&self) -> bool {
        self.calls.is_empty() && !self.id3_forwarded
    }
}

/// State held once the destination is configured
struct Configured {
    settings: DestinationSettings,
    id3: Id3Config,
    sink: Box<dyn MeasurementSink>,
}

enum Lifecycle {
    Unconfigured,
    Configured(Configured),
}

/// Nielsen DTVR destination plugin
///
/// ## Threading
///
/// All calls are synchronous and take `&mut self` where state changes.
/// The host is expected to deliver events one at a time; a host that
/// delivers concurrently must serialize access itself (e.g. a `Mutex`
/// per destination).
pub struct Destination {
    /// Creates the sink when the destination is configured
    factory: Box<dyn MeasurementSinkFactory>,

    lifecycle: Lifecycle,

    /// Last forwarded ID3 tag, kept across settings updates
    id3_state: Id3State,
}

impl Destination {
    /// Settings key for this destination
    pub const KEY: &'static str = "Nielsen DTVR";

    /// Create an unconfigured destination
    ///
    /// # Parameters
    ///
    /// - `factory`: initializes the SDK on the first `Initial` update
    pub fn new(factory: Box<dyn MeasurementSinkFactory>) -> Self {
        Self {
            factory,
            lifecycle: Lifecycle::Unconfigured,
            id3_state: Id3State::new(),
        }
    }

    /// Settings key for this destination
    pub fn key(&self) -> &'static str {
        Self::KEY
    }

    /// Whether the first `Initial` update has configured the destination
    pub fn is_configured(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Configured(_))
    }

    /// Settings in effect, once configured
    pub fn settings(&self) -> Option<&DestinationSettings> {
        match &self.lifecycle {
            Lifecycle::Configured(configured) => Some(&configured.settings),
            Lifecycle::Unconfigured => None,
        }
    }

    /// Normalized ID3 configuration, once configured
    pub fn id3_config(&self) -> Option<&Id3Config> {
        match &self.lifecycle {
            Lifecycle::Configured(configured) => Some(&configured.id3),
            Lifecycle::Unconfigured => None,
        }
    }

    /// ID3 deduplication state
    pub fn id3_state(&self) -> &Id3State {
        &self.id3_state
    }

    /// Apply a settings update
    ///
    /// Never fails: problems are logged and leave the destination dormant.
    pub fn update(&mut self, settings: &Settings, update_type: UpdateType) -> UpdateOutcome {
        if update_type != UpdateType::Initial {
            debug!("Ignoring {:?} settings update", update_type);
            return UpdateOutcome::IgnoredUpdateType;
        }

        if self.is_configured() {
            warn!("{} is already configured, ignoring settings update", Self::KEY);
            return UpdateOutcome::AlreadyConfigured;
        }

        if !settings.has_destination(Self::KEY) {
            debug!("No settings for {}, staying dormant", Self::KEY);
            return UpdateOutcome::NoSettings;
        }

        match self.configure(settings) {
            Ok(configured) => {
                self.lifecycle = Lifecycle::Configured(configured);
                UpdateOutcome::Configured
            }
            Err(e) => {
                warn!("Failed to set up {}: {}", Self::KEY, e);
                UpdateOutcome::SetupFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Observe a track event and pass it on unchanged
    pub fn track(&mut self, event: TrackEvent) -> TrackEvent {
        self.process(&event);
        event
    }

    /// Observe a track event and report what it caused
    pub fn process(&mut self, event: &TrackEvent) -> TrackOutcome {
        let Lifecycle::Configured(configured) = &self.lifecycle else {
            trace!("{} is dormant, skipping {}", Self::KEY, event.event);
            return TrackOutcome::default();
        };

        let properties = event.string_properties();
        let sink = configured.sink.as_ref();

        let (action, calls) = match VideoEvent::classify(&event.event) {
            Some(video_event) => (
                Some(dispatch::action_for(video_event)),
                dispatch::dispatch(video_event, &properties, sink),
            ),
            None => {
                trace!("Video event not found: {}", event.event);
                (None, Vec::new())
            }
        };

        let id3_forwarded = id3::maybe_forward_id3(
            &event.event,
            &properties,
            &configured.id3,
            &mut self.id3_state,
            sink,
        );

        TrackOutcome {
            action,
            calls,
            id3_forwarded,
        }
    }

    /// Build the configured state from a settings blob
    ///
    /// The settings are used as given; an empty `appId` still reaches the SDK.
    fn configure(&self, settings: &Settings) -> Result<Configured> {
        let destination_settings = settings
            .destination_settings::<DestinationSettings>(Self::KEY)?
            .ok_or_else(|| Error::settings(Self::KEY, "no settings entry"))?;

        let sdk_config = AppSdkConfig::from_settings(&destination_settings);
        let sink = self.factory.create(&sdk_config)?;
        match sdk_config.to_pretty_json() {
            Ok(json) => info!("new AppSdk({})", json),
            Err(e) => warn!("Failed to render SDK configuration: {}", e),
        }

        let id3 = Id3Config::from_settings(&destination_settings);
        debug!(
            "ID3 events: {:?}, property: {}",
            id3.event_names, id3.property_key
        );

        Ok(Configured {
            settings: destination_settings,
            id3,
            sink,
        })
    }
}
