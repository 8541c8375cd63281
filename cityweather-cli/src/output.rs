//! Output formatting for CLI commands

use cityweather_core::{QueryState, QueryStatus, WeatherCard};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputFormat::Json } else { OutputFormat::Text }
    }
}

/// Print the controller state: the result card, the error, or the
/// presentation contract as JSON.
pub fn print_state(state: &QueryState, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&state.view()) {
            Ok(json) => println!("{json}"),
            Err(err) => print_error(&format!("failed to serialize result: {err}")),
        },
        OutputFormat::Text => match (state.status(), render_text(state)) {
            (QueryStatus::Failed, Some(text)) => eprintln!("{text}"),
            (_, Some(text)) => println!("{text}"),
            (_, None) => {}
        },
    }
}

/// Text shown for a state; `None` when there is nothing to show yet.
pub fn render_text(state: &QueryState) -> Option<String> {
    match state.status() {
        QueryStatus::Idle => None,
        QueryStatus::Loading => Some("Loading...".to_string()),
        QueryStatus::Success => state.result().map(|s| WeatherCard::new(s).to_string()),
        QueryStatus::Failed => state.error_message().map(|msg| format!("Error: {msg}")),
    }
}

/// Print an error message (never suppressed)
pub fn print_error(message: &str) {
    eprintln!("Error: {message}");
}

/// Print a success message (suppressed in JSON mode)
pub fn print_success(message: &str, format: OutputFormat) {
    if format == OutputFormat::Text {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use cityweather_core::{QueryError, WeatherProvider, WeatherQueryController, WeatherSnapshot};

    use super::*;

    #[derive(Debug)]
    struct FixedProvider(Result<WeatherSnapshot, QueryError>);

    #[async_trait]
    impl WeatherProvider for FixedProvider {
        async fn current_weather(&self, _city: &str) -> Result<WeatherSnapshot, QueryError> {
            self.0.clone()
        }
    }

    fn london() -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "London".into(),
            country_code: "GB".into(),
            condition_main: "Clear".into(),
            condition_description: "clear sky".into(),
            temperature_c: 15.4,
            feels_like_c: 14.1,
            humidity_pct: 60,
            wind_speed_mps: 3.2,
            observed_at: None,
        }
    }

    fn controller(outcome: Result<WeatherSnapshot, QueryError>) -> WeatherQueryController {
        WeatherQueryController::new(Arc::new(FixedProvider(outcome)))
    }

    #[test]
    fn idle_state_renders_nothing() {
        assert_eq!(render_text(&QueryState::default()), None);
    }

    #[tokio::test]
    async fn loading_state_renders_loading() {
        let mut controller = controller(Ok(london()));
        controller.set_city_input("London");
        assert!(controller.submit_query());

        assert_eq!(render_text(controller.state()), Some("Loading...".to_string()));
    }

    #[tokio::test]
    async fn success_state_renders_card() {
        let mut controller = controller(Ok(london()));
        let state = controller.run_query("London").await;

        assert_eq!(
            render_text(state).as_deref(),
            Some(
                "☀\nLondon, GB\nClear - clear sky\n15°C\nFeels like: 14°C\nHumidity: 60%\n\
                 Wind Speed: 3.2 m/s"
            )
        );
    }

    #[tokio::test]
    async fn failed_state_renders_error_line() {
        let mut controller = controller(Err(QueryError::NotFound { status: 404 }));
        let state = controller.run_query("Zzzznotacity").await;

        assert_eq!(render_text(state), Some("Error: City not found".to_string()));
    }

    #[test]
    fn json_flag_selects_format() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Text);
    }
}
