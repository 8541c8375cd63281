//! Text rendering of a [`WeatherSnapshot`], line by line as the result card
//! shows it.

use std::fmt;

use crate::{
    icon::{WeatherIcon, icon_for},
    model::WeatherSnapshot,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCard {
    pub icon: Option<WeatherIcon>,
    pub title: String,
    pub condition: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub observed: Option<String>,
}

impl WeatherCard {
    pub fn new(snapshot: &WeatherSnapshot) -> Self {
        Self {
            icon: icon_for(&snapshot.condition_main),
            title: format!("{}, {}", snapshot.location_name, snapshot.country_code),
            condition: format!(
                "{} - {}",
                snapshot.condition_main, snapshot.condition_description
            ),
            temperature: format!("{}°C", whole_degrees(snapshot.temperature_c)),
            feels_like: format!("Feels like: {}°C", whole_degrees(snapshot.feels_like_c)),
            humidity: format!("Humidity: {}%", snapshot.humidity_pct),
            wind: format!("Wind Speed: {} m/s", snapshot.wind_speed_mps),
            observed: snapshot
                .observed_at
                .map(|at| format!("Observed at {}", at.format("%H:%M UTC"))),
        }
    }
}

impl fmt::Display for WeatherCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(icon) = self.icon {
            writeln!(f, "{icon}")?;
        }
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.condition)?;
        writeln!(f, "{}", self.temperature)?;
        writeln!(f, "{}", self.feels_like)?;
        writeln!(f, "{}", self.humidity)?;
        write!(f, "{}", self.wind)?;
        if let Some(observed) = &self.observed {
            write!(f, "\n{observed}")?;
        }
        Ok(())
    }
}

/// Round to a whole degree with ties towards +inf, so `-2.5` becomes `-2`.
fn whole_degrees(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}
