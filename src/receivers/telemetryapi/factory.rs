use std::sync::Arc;

use collector_kernel::{
    Component, ComponentConfig, ComponentError, CreateSettings, LogsConsumer, ReceiverFactory,
    TracesConsumer,
};
use collector_sharedcomponent::SharedComponents;

use super::config::Config;
use super::receiver::TelemetryApiReceiver;
use super::{STABILITY, TYPE_STR};

pub(crate) type Receivers = SharedComponents<Config, TelemetryApiReceiver>;

/// Create the receiver factory; default configs are bound to `extension_id`.
pub fn new_factory(extension_id: impl Into<String>) -> ReceiverFactory {
    factory_with_receivers(extension_id.into(), Receivers::new())
}

pub(crate) fn factory_with_receivers(
    extension_id: String,
    receivers: Receivers,
) -> ReceiverFactory {
    let traces_receivers = receivers.clone();

    ReceiverFactory::new(TYPE_STR, move || -> Box<dyn ComponentConfig> {
        Box::new(Config::new(extension_id.clone()))
    })
    .with_traces(
        move |settings, config, next| {
            create_traces_receiver(&traces_receivers, settings, config, next)
        },
        STABILITY,
    )
    .with_logs(
        move |settings, config, next| create_logs_receiver(&receivers, settings, config, next),
        STABILITY,
    )
}

fn resolve<A>(
    receivers: &Receivers,
    settings: &CreateSettings,
    config: &dyn ComponentConfig,
    attach: A,
) -> Result<Arc<dyn Component>, ComponentError>
where
    A: FnOnce(&TelemetryApiReceiver) -> Result<(), ComponentError>,
{
    let cfg = config
        .as_any()
        .downcast_ref::<Config>()
        .ok_or_else(|| ComponentError::config_mismatch("Telemetry API receiver"))?;

    let shared =
        receivers.get_or_add_with(cfg, || TelemetryApiReceiver::new(cfg, settings), attach)?;
    Ok(shared)
}

fn create_traces_receiver(
    receivers: &Receivers,
    settings: &CreateSettings,
    config: &dyn ComponentConfig,
    next: Arc<dyn TracesConsumer>,
) -> Result<Arc<dyn Component>, ComponentError> {
    resolve(receivers, settings, config, |receiver| {
        receiver.register_traces_consumer(next)
    })
}

fn create_logs_receiver(
    receivers: &Receivers,
    settings: &CreateSettings,
    config: &dyn ComponentConfig,
    next: Arc<dyn LogsConsumer>,
) -> Result<Arc<dyn Component>, ComponentError> {
    resolve(receivers, settings, config, |receiver| {
        receiver.register_logs_consumer(next)
    })
}
