//! Contract Test: ID3 Forwarding
//!
//! Verifies that ID3 tags are forwarded only from allow-listed events and
//! only when they change.
//!
//! Constraints verified:
//! - Allow-list matching ignores case
//! - A repeated tag is not forwarded again
//! - Empty or missing tags are ignored and leave state unchanged
//! - The check runs independently of video event dispatch

mod common;

use common::*;
use dtvr_core::config::{DestinationSettings, Id3Config};
use dtvr_core::id3::{Id3State, maybe_forward_id3};
use dtvr_core::traits::MeasurementSinkFactory;
use serde_json::json;
use std::collections::HashMap;

#[test]
fn allow_listed_event_forwards_id3() {
    let (mut destination, factory) = configured_destination();

    destination.track(track_event("sendId3EventA", &[("id3", "Test ID 3 A")]));

    assert_eq!(factory.calls(), vec![SinkCall::SendId3("Test ID 3 A".into())]);
}

#[test]
fn repeated_id3_is_forwarded_once() {
    let (mut destination, factory) = configured_destination();

    let event_a = track_event("sendId3EventA", &[("id3", "Test ID 3 A")]);
    // Different case, still allow-listed
    let event_b = track_event("sendID3EventA", &[("id3", "Test ID 3 B")]);

    destination.track(event_a.clone());
    destination.track(event_a);
    assert_eq!(factory.sent_id3(), vec!["Test ID 3 A"]);

    destination.track(event_b);
    assert_eq!(factory.sent_id3(), vec!["Test ID 3 A", "Test ID 3 B"]);
    assert_eq!(destination.id3_state().last_forwarded(), "Test ID 3 B");
}

#[test]
fn non_allow_listed_event_never_forwards() {
    let (mut destination, factory) = configured_destination();

    destination.track(track_event("nonID3Event", &[("id3", "Test Non ID 3 A")]));
    destination.track(track_event("nonID3Event", &[("id3", "Test Non ID 3 B")]));

    assert!(factory.sent_id3().is_empty());
    assert_eq!(destination.id3_state().last_forwarded(), "");
}

#[test]
fn empty_or_missing_id3_is_ignored() {
    let (mut destination, factory) = configured_destination();

    destination.track(track_event("sendId3EventA", &[("id3", "X")]));
    destination.track(track_event("sendId3EventA", &[("id3", "")]));
    destination.track(track_event("sendId3EventA", &[("other", "Y")]));
    destination.track(track_event("sendId3EventA", &[("id3", "X")]));

    assert_eq!(factory.sent_id3(), vec!["X"]);
    assert_eq!(destination.id3_state().last_forwarded(), "X");
}

#[test]
fn configured_property_key_is_used() {
    let settings = settings_blob(json!({
        "appId": "app",
        "debug": false,
        "sendId3Events": ["Tag Seen"],
        "id3Property": "nielsen_tag"
    }));
    let (mut destination, factory) = configured_destination_with(&settings);

    destination.track(track_event("tag seen", &[("id3", "ignored"), ("nielsen_tag", "T1")]));

    assert_eq!(factory.sent_id3(), vec!["T1"]);
}

#[test]
fn empty_property_key_falls_back_to_id3() {
    let settings = settings_blob(json!({
        "appId": "app",
        "debug": false,
        "sendId3Events": ["Tag Seen"],
        "id3Property": ""
    }));
    let (mut destination, factory) = configured_destination_with(&settings);

    destination.track(track_event("Tag Seen", &[("id3", "T1")]));

    assert_eq!(factory.sent_id3(), vec!["T1"]);
}

#[test]
fn video_event_can_also_carry_id3() {
    let settings = settings_blob(json!({
        "appId": "app",
        "debug": false,
        "sendId3Events": ["Video Playback Resumed"]
    }));
    let (mut destination, factory) = configured_destination_with(&settings);

    let outcome = destination.process(&track_event(
        "Video Playback Resumed",
        &[("channel", "C"), ("id3", "T1")],
    ));

    assert!(outcome.action.is_some());
    assert!(outcome.id3_forwarded);
    assert_eq!(
        factory.calls(),
        vec![
            SinkCall::Play(json!({ "channelName": "C" })),
            SinkCall::SendId3("T1".into()),
        ]
    );
}

#[test]
fn forwarding_sequence_against_explicit_state() {
    let factory = RecordingSinkFactory::new();
    let sink = factory
        .create(&dtvr_core::AppSdkConfig::from_settings(&DestinationSettings::new("app")))
        .unwrap();
    let config = Id3Config::from_settings(
        &DestinationSettings::new("app").with_id3_events(["send_a"]),
    );
    let mut state = Id3State::new();

    let props = |value: &str| HashMap::from([("id3".to_string(), value.to_string())]);

    assert!(maybe_forward_id3("send_a", &props("X"), &config, &mut state, sink.as_ref()));
    assert!(!maybe_forward_id3("send_a", &props("X"), &config, &mut state, sink.as_ref()));
    assert!(maybe_forward_id3("send_a", &props("Y"), &config, &mut state, sink.as_ref()));
    assert!(!maybe_forward_id3("send_b", &props("Z"), &config, &mut state, sink.as_ref()));

    assert_eq!(factory.sent_id3(), vec!["X", "Y"]);
}
