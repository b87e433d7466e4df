use anyhow::Context;
use clap::{Parser, Subcommand};
use collector_kernel::settings::Settings;
use collector_kernel::Signal;

#[derive(Debug, Parser)]
#[command(name = "collector-cli", about = "Lambda telemetry collector")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the collector until interrupted
    Run {
        /// Extension id the receivers attach to
        #[arg(long, env = "COLLECTOR_EXTENSION_ID")]
        extension_id: Option<String>,
    },
    /// List linked receiver factories and the signals they support
    Factories,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load collector settings")?;
    collector_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Run { extension_id } => {
            if let Some(id) = extension_id {
                settings.extension.id = id;
            }
            tracing::info!(
                env = ?settings.environment,
                extension = %settings.extension.id,
                "collector-cli run"
            );

            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(lambda_collector::run(settings))
        }
        Command::Factories => {
            let registry = lambda_collector::factory_registry(&settings)?;
            for factory in registry.factories() {
                let signals: Vec<String> = Signal::ALL
                    .into_iter()
                    .filter(|signal| factory.supports(*signal))
                    .map(|signal| format!("{}={}", signal, factory.stability(signal)))
                    .collect();
                println!("{}\t{}", factory.component_type(), signals.join(" "));
            }
            Ok(())
        }
    }
}
