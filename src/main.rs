use anyhow::Context;
use collector_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load collector settings")?;
    collector_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        extension = %settings.extension.id,
        "lambda-collector bootstrap starting"
    );

    lambda_collector::run(settings).await
}
