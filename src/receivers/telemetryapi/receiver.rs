use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use collector_kernel::pdata::{Logs, Traces};
use collector_kernel::{
    Component, ComponentConfig, ComponentError, ComponentId, CreateSettings, HostCtx,
    LogsConsumer, Signal, TracesConsumer,
};
use uuid::Uuid;

use super::config::Config;
use super::TYPE_STR;

#[derive(Default)]
struct Consumers {
    traces: Option<Arc<dyn TracesConsumer>>,
    logs: Option<Arc<dyn LogsConsumer>>,
}

/// Receiver bound to one extension, shared by the traces and logs pipelines.
pub struct TelemetryApiReceiver {
    instance_id: Uuid,
    id: ComponentId,
    config: Config,
    consumers: Mutex<Consumers>,
    running: AtomicBool,
}

impl TelemetryApiReceiver {
    pub fn new(config: &Config, settings: &CreateSettings) -> Result<Self, ComponentError> {
        config.validate()?;

        let receiver = Self {
            instance_id: Uuid::now_v7(),
            id: settings.id.clone(),
            config: config.clone(),
            consumers: Mutex::new(Consumers::default()),
            running: AtomicBool::new(false),
        };
        tracing::debug!(
            receiver = %receiver.id,
            instance = %receiver.instance_id,
            extension = %receiver.config.extension_id,
            "telemetry api receiver created"
        );
        Ok(receiver)
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn extension_id(&self) -> &str {
        &self.config.extension_id
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn has_consumer(&self, signal: Signal) -> bool {
        let consumers = self.consumers();
        match signal {
            Signal::Traces => consumers.traces.is_some(),
            Signal::Logs => consumers.logs.is_some(),
        }
    }

    /// Attach the traces sink. A second registration fails and keeps the first sink.
    pub fn register_traces_consumer(
        &self,
        next: Arc<dyn TracesConsumer>,
    ) -> Result<(), ComponentError> {
        let mut consumers = self.consumers();
        if consumers.traces.is_some() {
            return Err(ComponentError::consumer_already_registered(
                TYPE_STR,
                Signal::Traces,
            ));
        }
        consumers.traces = Some(next);
        tracing::debug!(
            receiver = %self.id,
            instance = %self.instance_id,
            "traces consumer registered"
        );
        Ok(())
    }

    /// Attach the logs sink. A second registration fails and keeps the first sink.
    pub fn register_logs_consumer(
        &self,
        next: Arc<dyn LogsConsumer>,
    ) -> Result<(), ComponentError> {
        let mut consumers = self.consumers();
        if consumers.logs.is_some() {
            return Err(ComponentError::consumer_already_registered(
                TYPE_STR,
                Signal::Logs,
            ));
        }
        consumers.logs = Some(next);
        tracing::debug!(
            receiver = %self.id,
            instance = %self.instance_id,
            "logs consumer registered"
        );
        Ok(())
    }

    /// Hand traces to the attached sink; dropped when no traces pipeline is attached
    pub async fn forward_traces(&self, traces: Traces) -> anyhow::Result<()> {
        let next = self.consumers().traces.clone();
        match next {
            Some(next) => next.consume_traces(traces).await,
            None => {
                tracing::debug!(
                    receiver = %self.id,
                    spans = traces.span_count(),
                    "no traces consumer, dropping spans"
                );
                Ok(())
            }
        }
    }

    /// Hand logs to the attached sink; dropped when no logs pipeline is attached
    pub async fn forward_logs(&self, logs: Logs) -> anyhow::Result<()> {
        let next = self.consumers().logs.clone();
        match next {
            Some(next) => next.consume_logs(logs).await,
            None => {
                tracing::debug!(
                    receiver = %self.id,
                    records = logs.record_count(),
                    "no logs consumer, dropping records"
                );
                Ok(())
            }
        }
    }

    fn consumers(&self) -> std::sync::MutexGuard<'_, Consumers> {
        self.consumers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Component for TelemetryApiReceiver {
    async fn start(&self, ctx: &HostCtx<'_>) -> anyhow::Result<()> {
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(
            receiver = %self.id,
            instance = %self.instance_id,
            extension = %self.config.extension_id,
            environment = ?ctx.settings.environment,
            traces = self.has_consumer(Signal::Traces),
            logs = self.has_consumer(Signal::Logs),
            "telemetry api receiver started"
        );
        Ok(())
    }

    async fn shutdown(&self) -> anyhow::Result<()> {
        self.running.store(false, Ordering::SeqCst);
        tracing::info!(
            receiver = %self.id,
            instance = %self.instance_id,
            "telemetry api receiver stopped"
        );
        Ok(())
    }
}
