use std::any::Any;
use std::fmt;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ComponentError;

/// Context provided to components when the host starts them
pub struct HostCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Static type name of a component, e.g. `telemetryapi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentType(&'static str);

impl ComponentType {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifier of a configured component: `type` or `type/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentId {
    kind: String,
    name: Option<String>,
}

impl ComponentId {
    /// Create an id with no instance name
    pub fn new(kind: ComponentType) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            name: None,
        }
    }

    /// Create an id with an instance name
    pub fn with_name(kind: ComponentType, name: impl Into<String>) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            name: Some(name.into()),
        }
    }

    /// Parse `type` or `type/name`
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let raw = raw.trim();
        let (kind, name) = match raw.split_once('/') {
            Some((kind, name)) => (kind.trim(), Some(name.trim())),
            None => (raw, None),
        };

        if kind.is_empty() {
            return Err(anyhow!("component id '{}' has an empty type", raw));
        }
        if name.is_some_and(str::is_empty) {
            return Err(anyhow!("component id '{}' has an empty name", raw));
        }

        Ok(Self {
            kind: kind.to_string(),
            name: name.map(str::to_string),
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}/{}", self.kind, name),
            None => f.write_str(&self.kind),
        }
    }
}

/// Telemetry signal a pipeline carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Traces,
    Logs,
}

impl Signal {
    pub const ALL: [Signal; 2] = [Signal::Traces, Signal::Logs];
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Traces => f.write_str("traces"),
            Signal::Logs => f.write_str("logs"),
        }
    }
}

/// Maturity of a component for a given signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StabilityLevel {
    #[default]
    Undefined,
    Unmaintained,
    Deprecated,
    Development,
    Alpha,
    Beta,
    Stable,
}

impl fmt::Display for StabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StabilityLevel::Undefined => "undefined",
            StabilityLevel::Unmaintained => "unmaintained",
            StabilityLevel::Deprecated => "deprecated",
            StabilityLevel::Development => "development",
            StabilityLevel::Alpha => "alpha",
            StabilityLevel::Beta => "beta",
            StabilityLevel::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Settings handed to a factory create callback
#[derive(Debug, Clone)]
pub struct CreateSettings {
    pub id: ComponentId,
}

impl CreateSettings {
    pub fn new(id: ComponentId) -> Self {
        Self { id }
    }
}

/// Configuration value produced by a factory and passed back into it opaquely.
pub trait ComponentConfig: fmt::Debug + Send + Sync {
    /// Access the concrete config for type checks
    fn as_any(&self) -> &dyn Any;

    /// Validate the config before any component is created from it
    fn validate(&self) -> Result<(), ComponentError> {
        Ok(())
    }
}

/// Lifecycle every component created by a factory exposes to the host
#[async_trait]
pub trait Component: Send + Sync {
    /// Start the component
    /// Called once the host has built every pipeline
    async fn start(&self, _ctx: &HostCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the component and clean up resources
    /// Called during host shutdown, once per handle the host holds
    async fn shutdown(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
