//! Builds receivers for the configured pipelines and drives their lifecycle.

use anyhow::{anyhow, Context};
use std::sync::Arc;

use crate::component::{Component, ComponentId, CreateSettings, HostCtx, Signal};
use crate::consumer::{LogsConsumer, TracesConsumer};
use crate::registry::FactoryRegistry;
use crate::settings::PipelineSettings;

struct BuiltReceiver {
    id: ComponentId,
    signal: Signal,
    component: Arc<dyn Component>,
}

/// Receivers created for every pipeline, in build order
pub struct Service {
    receivers: Vec<BuiltReceiver>,
}

impl Service {
    /// Create one receiver per pipeline entry and attach the pipeline sink to it
    pub fn build(
        registry: &FactoryRegistry,
        pipelines: &PipelineSettings,
        traces_sink: Arc<dyn TracesConsumer>,
        logs_sink: Arc<dyn LogsConsumer>,
    ) -> anyhow::Result<Self> {
        let mut receivers = Vec::new();

        for (signal, ids) in [
            (Signal::Traces, &pipelines.traces),
            (Signal::Logs, &pipelines.logs),
        ] {
            for raw in ids {
                let id = ComponentId::parse(raw)
                    .with_context(|| format!("invalid receiver id in {} pipeline", signal))?;
                let factory = registry.get(id.kind()).ok_or_else(|| {
                    anyhow!("no receiver factory registered for '{}'", id.kind())
                })?;

                let config = factory.create_default_config();
                config
                    .validate()
                    .with_context(|| format!("invalid config for receiver '{}'", id))?;

                let settings = CreateSettings::new(id.clone());
                let component = match signal {
                    Signal::Traces => {
                        factory.create_traces(&settings, config.as_ref(), traces_sink.clone())
                    }
                    Signal::Logs => {
                        factory.create_logs(&settings, config.as_ref(), logs_sink.clone())
                    }
                }
                .with_context(|| {
                    format!("failed to create {} receiver '{}'", signal, id)
                })?;

                tracing::info!(receiver = %id, %signal, "receiver created");
                receivers.push(BuiltReceiver {
                    id,
                    signal,
                    component,
                });
            }
        }

        Ok(Self { receivers })
    }

    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// Start receivers in build order
    pub async fn start(&self, ctx: &HostCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("starting {} receivers", self.receivers.len());

        for receiver in &self.receivers {
            tracing::info!(receiver = %receiver.id, signal = %receiver.signal, "starting receiver");

            receiver
                .component
                .start(ctx)
                .await
                .with_context(|| format!("failed to start receiver '{}'", receiver.id))?;
        }

        Ok(())
    }

    /// Shut receivers down in reverse order
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} receivers", self.receivers.len());

        for receiver in self.receivers.iter().rev() {
            tracing::info!(receiver = %receiver.id, signal = %receiver.signal, "stopping receiver");

            receiver
                .component
                .shutdown()
                .await
                .with_context(|| format!("failed to stop receiver '{}'", receiver.id))?;
        }

        Ok(())
    }
}
