use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "COLLECTOR_ENV";
const CONFIG_DIR_ENV: &str = "COLLECTOR_CONFIG_DIR";
const EXTENSION_ID_ENV: &str = "COLLECTOR_EXTENSION_ID";

/// Deployment environment the collector is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub extension: ExtensionSettings,
    #[serde(default)]
    pub pipelines: PipelineSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        let base_path = config_dir.join("base.toml");
        let environment_filename = format!("{}.toml", environment);
        let environment_path = config_dir.join(environment_filename);

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(config::Environment::with_prefix("COLLECTOR").separator("__"));

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parse_environment(&environment)?;

        // The extension id is handed out at runtime, so a flat variable wins over files.
        if let Ok(id) = std::env::var(EXTENSION_ID_ENV) {
            settings.extension.id = id;
        }

        Ok(settings)
    }
}

fn parse_environment(environment: &str) -> anyhow::Result<Environment> {
    match environment {
        "local" => Ok(Environment::Local),
        "staging" => Ok(Environment::Staging),
        "production" => Ok(Environment::Production),
        other => Err(anyhow!(
            "unsupported environment '{}'; expected local/staging/production",
            other
        )),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default = "TelemetrySettings::default_level")]
    pub level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl TelemetrySettings {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Identity of the extension receivers attach to.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExtensionSettings {
    #[serde(default)]
    pub id: String,
}

/// Receiver ids wired into each signal pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "PipelineSettings::default_receivers")]
    pub traces: Vec<String>,
    #[serde(default = "PipelineSettings::default_receivers")]
    pub logs: Vec<String>,
}

impl PipelineSettings {
    fn default_receivers() -> Vec<String> {
        vec!["telemetryapi".to_string()]
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            traces: Self::default_receivers(),
            logs: Self::default_receivers(),
        }
    }
}
