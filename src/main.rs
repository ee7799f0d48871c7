use anyhow::Context;
use clap::Parser;

use medingest::infrastructure::observability::{TracingConfig, init_tracing};
use medingest::presentation::{AppState, Cli, Environment, Settings, SettingsError, dispatch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let environment = Environment::try_from(cli.environment.clone())
        .map_err(SettingsError::Environment)
        .context("Failed to parse APP_ENVIRONMENT")?;
    let settings = Settings::load_from(&cli.config_dir, environment)
        .with_context(|| format!("Failed to load settings from {}", cli.config_dir.display()))?;

    init_tracing(&TracingConfig {
        app_name: settings.app.name.clone(),
        app_version: settings.app.version.clone(),
        environment: environment.to_string(),
        level: settings.logging.level.clone(),
        json_format: settings.logging.enable_json,
    });

    let state = AppState::from_settings(settings).context("Failed to initialise services")?;
    dispatch(&state, cli.command).await?;

    Ok(())
}
