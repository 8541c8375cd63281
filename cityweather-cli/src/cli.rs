use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cityweather_core::{
    Config, QueryStatus, WeatherQueryController,
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    provider_from_config,
};
use inquire::{
    Confirm, CustomType, InquireError, Password, PasswordDisplayMode, Text, error::CustomUserError,
    validator::Validation,
};
use tracing::debug;

use crate::output::{self, OutputFormat};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Print the query state as JSON instead of a text card.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and connection options.
    Configure,

    /// Show current weather for one city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,
    },

    /// Prompt for city names until cancelled (the default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let format = OutputFormat::from_json_flag(self.json);

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(format),
            Command::Show { city } => show(city, format).await,
            Command::Interactive => interactive(format).await,
        }
    }
}

fn new_controller() -> anyhow::Result<WeatherQueryController> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok(WeatherQueryController::new(provider))
}

async fn show(city: String, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let mut controller = new_controller()?;
    let state = controller.run_query(city).await;

    output::print_state(state, format);

    Ok(match state.status() {
        QueryStatus::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

async fn interactive(format: OutputFormat) -> anyhow::Result<ExitCode> {
    let mut controller = new_controller()?;

    loop {
        // Keep whatever was typed last so a failed lookup can be corrected.
        let answer = Text::new("City:")
            .with_placeholder("Enter city name")
            .with_initial_value(controller.state().city_input())
            .with_help_message("Enter to search, Esc to quit")
            .prompt();

        let city = match answer {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(ExitCode::SUCCESS);
            }
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        controller.set_city_input(city);
        if controller.submit_query() {
            output::print_state(controller.state(), format);
        }
        controller.wait().await;
        debug!(status = %controller.state().status(), "query resolved");
        output::print_state(controller.state(), format);
    }
}

fn configure(format: OutputFormat) -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let replace_key = !config.has_api_key()
        || Confirm::new("An API key is already stored. Replace it?")
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;

    if replace_key {
        let api_key = Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_validator(inquire::required!("An API key is required"))
            .prompt()
            .context("Failed to read API key")?;
        config.set_api_key(api_key.trim().to_string());
    }

    let current_base = config
        .provider
        .base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = Text::new("Provider base URL:")
        .with_default(&current_base)
        .prompt()
        .context("Failed to read base URL")?;
    config.provider.base_url = (base_url != DEFAULT_BASE_URL).then_some(base_url);

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.provider.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
        .with_error_message("Please type a whole number of seconds")
        .with_validator(|secs: &u64| -> Result<Validation, CustomUserError> {
            Ok(if *secs == 0 {
                Validation::Invalid("The timeout must be greater than zero".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()
        .context("Failed to read timeout")?;
    config.provider.timeout_secs =
        (timeout_secs != DEFAULT_TIMEOUT_SECS).then_some(timeout_secs);

    let path = config.save()?;
    debug!(path = %path.display(), "configuration saved");
    output::print_success(&format!("Configuration saved to {}", path.display()), format);

    Ok(ExitCode::SUCCESS)
}
