//! Seams between the destination and the measurement SDK
//!
//! - [`MeasurementSink`]: the four SDK calls the destination issues
//! - [`MeasurementSinkFactory`]: SDK initialization from [`AppSdkConfig`](crate::config::AppSdkConfig)

pub mod measurement_sink;

pub use measurement_sink::{JsonObject, MeasurementSink, MeasurementSinkFactory};
