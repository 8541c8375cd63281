//! Query lifecycle state.
//!
//! The result and the error message live inside the stage they belong to, so
//! a state can never hold both, and neither exists while idle or loading.

use serde::Serialize;

use crate::{error::QueryError, model::WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Failed,
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            QueryStatus::Idle => "idle",
            QueryStatus::Loading => "loading",
            QueryStatus::Success => "success",
            QueryStatus::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Stage {
    #[default]
    Idle,
    Loading,
    Success(WeatherSnapshot),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    city_input: String,
    stage: Stage,
}

impl QueryState {
    pub fn city_input(&self) -> &str {
        &self.city_input
    }

    pub fn status(&self) -> QueryStatus {
        match self.stage {
            Stage::Idle => QueryStatus::Idle,
            Stage::Loading => QueryStatus::Loading,
            Stage::Success(_) => QueryStatus::Success,
            Stage::Failed(_) => QueryStatus::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.stage, Stage::Loading)
    }

    pub fn result(&self) -> Option<&WeatherSnapshot> {
        match &self.stage {
            Stage::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.stage {
            Stage::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Borrowed projection handed to presentation layers.
    pub fn view(&self) -> QueryView<'_> {
        QueryView {
            city_input: &self.city_input,
            status: self.status(),
            result: self.result(),
            error_message: self.error_message(),
        }
    }

    pub(crate) fn set_city_input(&mut self, text: String) {
        self.city_input = text;
    }

    pub(crate) fn begin(&mut self) {
        self.stage = Stage::Loading;
    }

    pub(crate) fn succeed(&mut self, snapshot: WeatherSnapshot) {
        self.stage = Stage::Success(snapshot);
    }

    pub(crate) fn fail(&mut self, error: &QueryError) {
        self.stage = Stage::Failed(error.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryView<'a> {
    pub city_input: &'a str,
    pub status: QueryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a WeatherSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'a str>,
}
