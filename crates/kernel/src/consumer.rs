//! Sinks receivers hand decoded telemetry to.

use async_trait::async_trait;

use crate::pdata::{Logs, Traces};

/// Accepts trace data from a receiver
#[async_trait]
pub trait TracesConsumer: Send + Sync {
    async fn consume_traces(&self, traces: Traces) -> anyhow::Result<()>;
}

/// Accepts log data from a receiver
#[async_trait]
pub trait LogsConsumer: Send + Sync {
    async fn consume_logs(&self, logs: Logs) -> anyhow::Result<()>;
}

/// Consumer that reports what it receives through `tracing` and drops the data.
#[derive(Debug, Clone)]
pub struct LoggingConsumer {
    pipeline: String,
}

impl LoggingConsumer {
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
        }
    }
}

#[async_trait]
impl TracesConsumer for LoggingConsumer {
    async fn consume_traces(&self, traces: Traces) -> anyhow::Result<()> {
        tracing::info!(
            pipeline = %self.pipeline,
            spans = traces.span_count(),
            "traces received"
        );
        Ok(())
    }
}

#[async_trait]
impl LogsConsumer for LoggingConsumer {
    async fn consume_logs(&self, logs: Logs) -> anyhow::Result<()> {
        tracing::info!(
            pipeline = %self.pipeline,
            records = logs.record_count(),
            "logs received"
        );
        for record in &logs.records {
            tracing::debug!(pipeline = %self.pipeline, body = %record.body, "log record");
        }
        Ok(())
    }
}
