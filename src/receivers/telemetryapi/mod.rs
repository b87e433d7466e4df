//! Receiver for the Lambda Telemetry API.
//!
//! One receiver instance is created per distinct [`Config`] and serves both
//! the traces and logs pipelines that reference it.

mod config;
mod factory;
mod receiver;

use collector_kernel::{ComponentType, StabilityLevel};

pub use config::Config;
pub use factory::new_factory;
pub use receiver::TelemetryApiReceiver;

pub const TYPE_STR: ComponentType = ComponentType::new("telemetryapi");
pub const STABILITY: StabilityLevel = StabilityLevel::Development;
