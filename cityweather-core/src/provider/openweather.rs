use anyhow::Context;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt, time::Duration};
use tracing::{debug, warn};

use crate::{config::ProviderSettings, error::QueryError, model::WeatherSnapshot};

use super::WeatherProvider;

/// OpenWeatherMap "current weather" endpoint, metric units.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    timeout: Duration,
    http: Client,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(settings: &ProviderSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key: settings.api_key.clone(),
            endpoint: format!("{}/weather", settings.base_url.trim_end_matches('/')),
            timeout: settings.timeout,
            http,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> QueryError {
        if err.is_timeout() {
            return QueryError::Transport(format!(
                "Request timed out after {}s",
                self.timeout.as_secs_f64()
            ));
        }
        // the URL carries the api key in its query string
        QueryError::transport(&err.without_url())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

fn parse_current(body: &str) -> Result<WeatherSnapshot, QueryError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| QueryError::Parse { detail: e.to_string() })?;

    let condition = parsed.weather.into_iter().next().ok_or_else(|| QueryError::Parse {
        detail: "response contained no weather conditions".to_string(),
    })?;

    Ok(WeatherSnapshot {
        location_name: parsed.name,
        country_code: parsed.sys.country,
        condition_main: condition.main,
        condition_description: condition.description,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        observed_at: parsed.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, QueryError> {
        debug!(city, endpoint = %self.endpoint, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(city, %status, body = %truncate_body(&body), "OpenWeather rejected the request");
            return Err(QueryError::NotFound { status: status.as_u16() });
        }

        let body = res.text().await.map_err(|e| self.transport_error(e))?;

        parse_current(&body).inspect_err(|err| {
            if let QueryError::Parse { detail } = err {
                warn!(city, %detail, "failed to parse OpenWeather response");
            }
        })
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn settings(base_url: String) -> ProviderSettings {
        ProviderSettings {
            api_key: "test-key".to_string(),
            base_url,
            timeout: Duration::from_secs(5),
        }
    }

    fn london_body() -> serde_json::Value {
        json!({
            "name": "London",
            "dt": 1714555800,
            "sys": { "country": "GB" },
            "weather": [{ "main": "Clear", "description": "clear sky" }],
            "main": { "temp": 15.4, "feels_like": 14.1, "humidity": 60 },
            "wind": { "speed": 3.2 }
        })
    }

    #[tokio::test]
    async fn sends_metric_query_and_parses_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&settings(server.uri())).expect("provider");
        let snapshot = provider.current_weather("London").await.expect("success");

        assert_eq!(snapshot.location_name, "London");
        assert_eq!(snapshot.country_code, "GB");
        assert_eq!(snapshot.condition_main, "Clear");
        assert_eq!(snapshot.condition_description, "clear sky");
        assert_eq!(snapshot.temperature_c, 15.4);
        assert_eq!(snapshot.feels_like_c, 14.1);
        assert_eq!(snapshot.humidity_pct, 60);
        assert_eq!(snapshot.wind_speed_mps, 3.2);
        assert_eq!(
            snapshot.observed_at.map(|t| t.timestamp()),
            Some(1714555800)
        );
    }

    #[tokio::test]
    async fn city_with_spaces_is_url_encoded() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .and(query_param("q", "São Paulo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
            .expect(1)
            .mount(&server)
            .await;

        let base = format!("{}/", server.uri());
        let provider = OpenWeatherProvider::new(&settings(base)).expect("provider");
        assert!(provider.current_weather("São Paulo").await.is_ok());
    }

    #[tokio::test]
    async fn missing_observation_time_is_allowed() {
        let server = MockServer::start().await;
        let mut body = london_body();
        body.as_object_mut().expect("object").remove("dt");
        Mock::given(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&settings(server.uri())).expect("provider");
        let snapshot = provider.current_weather("London").await.expect("success");
        assert_eq!(snapshot.observed_at, None);
    }

    #[tokio::test]
    async fn non_success_status_is_city_not_found() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&settings(server.uri())).expect("provider");
        let err = provider.current_weather("Zzzznotacity").await.unwrap_err();

        assert_eq!(err, QueryError::NotFound { status: 404 });
        assert_eq!(err.to_string(), "City not found");
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&settings(server.uri())).expect("provider");
        let err = provider.current_weather("London").await.unwrap_err();

        assert!(matches!(err, QueryError::Parse { .. }));
        assert_eq!(err.to_string(), "Unexpected response from weather service");
    }

    #[tokio::test]
    async fn empty_weather_array_is_parse_error() {
        let server = MockServer::start().await;
        let mut body = london_body();
        body["weather"] = json!([]);
        Mock::given(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&settings(server.uri())).expect("provider");
        let err = provider.current_weather("London").await.unwrap_err();

        assert!(matches!(err, QueryError::Parse { .. }));
    }

    #[tokio::test]
    async fn slow_provider_times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(london_body())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let mut settings = settings(server.uri());
        settings.timeout = Duration::from_millis(200);
        let provider = OpenWeatherProvider::new(&settings).expect("provider");
        let err = provider.current_weather("London").await.unwrap_err();

        assert_eq!(
            err,
            QueryError::Transport("Request timed out after 0.2s".to_string())
        );
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error_without_api_key() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };

        let provider = OpenWeatherProvider::new(&settings(format!("http://127.0.0.1:{port}")))
            .expect("provider");
        let err = provider.current_weather("London").await.unwrap_err();

        let QueryError::Transport(message) = err else {
            panic!("expected transport error, got {err:?}");
        };
        assert!(!message.is_empty());
        assert!(!message.contains("test-key"));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let provider =
            OpenWeatherProvider::new(&settings("http://localhost".into())).expect("provider");
        assert!(!format!("{provider:?}").contains("test-key"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(truncate_body(&body).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
