//! Errors surfaced by components to the host.

use thiserror::Error;

use crate::component::{ComponentType, Signal};

/// Errors returned from factory callbacks and component construction.
#[derive(Error, Debug)]
pub enum ComponentError {
    /// The config handed to a factory is not the concrete type it expects.
    #[error("config was not a {expected} config")]
    ConfigMismatch { expected: &'static str },

    #[error("invalid {component} config: {message}")]
    InvalidConfig {
        component: ComponentType,
        message: String,
    },

    #[error("{signal} consumer already registered on {component}")]
    ConsumerAlreadyRegistered {
        component: ComponentType,
        signal: Signal,
    },

    #[error("{component} does not support {signal}")]
    SignalNotSupported {
        component: ComponentType,
        signal: Signal,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ComponentError {
    /// Create a config mismatch error
    pub fn config_mismatch(expected: &'static str) -> Self {
        Self::ConfigMismatch { expected }
    }

    /// Create an invalid config error
    pub fn invalid_config(component: ComponentType, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            component,
            message: message.into(),
        }
    }

    /// Create a duplicate consumer error
    pub fn consumer_already_registered(component: ComponentType, signal: Signal) -> Self {
        Self::ConsumerAlreadyRegistered { component, signal }
    }

    /// Create an unsupported signal error
    pub fn signal_not_supported(component: ComponentType, signal: Signal) -> Self {
        Self::SignalNotSupported { component, signal }
    }
}
