//! Receiver factory descriptor the host uses to create receivers per signal.

use std::sync::Arc;

use crate::component::{
    Component, ComponentConfig, ComponentType, CreateSettings, Signal, StabilityLevel,
};
use crate::consumer::{LogsConsumer, TracesConsumer};
use crate::error::ComponentError;

pub type DefaultConfigFn = Box<dyn Fn() -> Box<dyn ComponentConfig> + Send + Sync>;

pub type CreateTracesFn = Box<
    dyn Fn(
            &CreateSettings,
            &dyn ComponentConfig,
            Arc<dyn TracesConsumer>,
        ) -> Result<Arc<dyn Component>, ComponentError>
        + Send
        + Sync,
>;

pub type CreateLogsFn = Box<
    dyn Fn(
            &CreateSettings,
            &dyn ComponentConfig,
            Arc<dyn LogsConsumer>,
        ) -> Result<Arc<dyn Component>, ComponentError>
        + Send
        + Sync,
>;

/// Factory for one receiver type with optional per-signal create callbacks
pub struct ReceiverFactory {
    component_type: ComponentType,
    default_config: DefaultConfigFn,
    traces: Option<(CreateTracesFn, StabilityLevel)>,
    logs: Option<(CreateLogsFn, StabilityLevel)>,
}

impl ReceiverFactory {
    /// Create a factory that supports no signals yet
    pub fn new<F>(component_type: ComponentType, default_config: F) -> Self
    where
        F: Fn() -> Box<dyn ComponentConfig> + Send + Sync + 'static,
    {
        Self {
            component_type,
            default_config: Box::new(default_config),
            traces: None,
            logs: None,
        }
    }

    /// Add trace receiver support
    pub fn with_traces<F>(mut self, create: F, stability: StabilityLevel) -> Self
    where
        F: Fn(
                &CreateSettings,
                &dyn ComponentConfig,
                Arc<dyn TracesConsumer>,
            ) -> Result<Arc<dyn Component>, ComponentError>
            + Send
            + Sync
            + 'static,
    {
        self.traces = Some((Box::new(create), stability));
        self
    }

    /// Add log receiver support
    pub fn with_logs<F>(mut self, create: F, stability: StabilityLevel) -> Self
    where
        F: Fn(
                &CreateSettings,
                &dyn ComponentConfig,
                Arc<dyn LogsConsumer>,
            ) -> Result<Arc<dyn Component>, ComponentError>
            + Send
            + Sync
            + 'static,
    {
        self.logs = Some((Box::new(create), stability));
        self
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn create_default_config(&self) -> Box<dyn ComponentConfig> {
        (self.default_config)()
    }

    pub fn supports(&self, signal: Signal) -> bool {
        match signal {
            Signal::Traces => self.traces.is_some(),
            Signal::Logs => self.logs.is_some(),
        }
    }

    /// Stability for a signal; `Undefined` when the signal is unsupported
    pub fn stability(&self, signal: Signal) -> StabilityLevel {
        let stability = match signal {
            Signal::Traces => self.traces.as_ref().map(|(_, level)| *level),
            Signal::Logs => self.logs.as_ref().map(|(_, level)| *level),
        };
        stability.unwrap_or_default()
    }

    /// Signals this factory can create receivers for
    pub fn signals(&self) -> Vec<Signal> {
        Signal::ALL
            .into_iter()
            .filter(|signal| self.supports(*signal))
            .collect()
    }

    pub fn create_traces(
        &self,
        settings: &CreateSettings,
        config: &dyn ComponentConfig,
        next: Arc<dyn TracesConsumer>,
    ) -> Result<Arc<dyn Component>, ComponentError> {
        let (create, _) = self.traces.as_ref().ok_or_else(|| {
            ComponentError::signal_not_supported(self.component_type, Signal::Traces)
        })?;
        create(settings, config, next)
    }

    pub fn create_logs(
        &self,
        settings: &CreateSettings,
        config: &dyn ComponentConfig,
        next: Arc<dyn LogsConsumer>,
    ) -> Result<Arc<dyn Component>, ComponentError> {
        let (create, _) = self.logs.as_ref().ok_or_else(|| {
            ComponentError::signal_not_supported(self.component_type, Signal::Logs)
        })?;
        create(settings, config, next)
    }
}

impl std::fmt::Debug for ReceiverFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiverFactory")
            .field("component_type", &self.component_type)
            .field("signals", &self.signals())
            .finish()
    }
}
