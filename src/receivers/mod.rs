pub mod telemetryapi;

use collector_kernel::settings::Settings;
use collector_kernel::{FactoryRegistration, ReceiverFactory};

fn build_telemetryapi(settings: &Settings) -> ReceiverFactory {
    telemetryapi::new_factory(settings.extension.id.clone())
}

inventory::submit! {
    FactoryRegistration {
        component_type: "telemetryapi",
        build: build_telemetryapi,
    }
}
