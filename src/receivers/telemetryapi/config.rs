use std::any::Any;

use collector_kernel::{ComponentConfig, ComponentError};
use serde::Deserialize;

use super::TYPE_STR;

/// Telemetry API receiver configuration.
///
/// Equal configs resolve to the same receiver instance, so every field takes
/// part in the shared-instance key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct Config {
    /// Id of the extension the receiver subscribes through
    pub extension_id: String,
}

impl Config {
    pub fn new(extension_id: impl Into<String>) -> Self {
        Self {
            extension_id: extension_id.into(),
        }
    }
}

impl ComponentConfig for Config {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn validate(&self) -> Result<(), ComponentError> {
        if self.extension_id.trim().is_empty() {
            return Err(ComponentError::invalid_config(
                TYPE_STR,
                "extension_id must not be empty",
            ));
        }
        Ok(())
    }
}
