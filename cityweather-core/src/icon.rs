use serde::Serialize;

/// Condition categories that have a dedicated icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Clear,
    Rain,
    Snow,
}

const CATEGORIES: [(&str, ConditionCategory); 3] = [
    ("Clear", ConditionCategory::Clear),
    ("Rain", ConditionCategory::Rain),
    ("Snow", ConditionCategory::Snow),
];

impl ConditionCategory {
    /// Match a provider `weather[0].main` value. Case-sensitive.
    pub fn from_main(main: &str) -> Option<Self> {
        CATEGORIES
            .iter()
            .find(|(name, _)| *name == main)
            .map(|(_, category)| *category)
    }

    pub fn icon(self) -> WeatherIcon {
        match self {
            ConditionCategory::Clear => WeatherIcon::Sun,
            ConditionCategory::Rain => WeatherIcon::CloudRain,
            ConditionCategory::Snow => WeatherIcon::Snowflake,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    Sun,
    CloudRain,
    Snowflake,
}

impl WeatherIcon {
    /// Terminal rendering of the icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀",
            WeatherIcon::CloudRain => "🌧",
            WeatherIcon::Snowflake => "❄",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Icon for a provider condition category; `None` for anything without one.
pub fn icon_for(condition_main: &str) -> Option<WeatherIcon> {
    ConditionCategory::from_main(condition_main).map(ConditionCategory::icon)
}
