//! Query lifecycle controller.
//!
//! [`WeatherQueryController`] owns the [`QueryState`] and at most one
//! in-flight provider request. The request runs as a tokio task; its outcome
//! is applied only through the controller (`poll` from an event loop, or
//! `wait` from async code), so a controller that has been dropped can never
//! be updated by a late completion.

use std::sync::Arc;

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::{
    error::QueryError,
    model::WeatherSnapshot,
    provider::WeatherProvider,
    state::{QueryState, QueryView},
};

type QueryOutcome = Result<WeatherSnapshot, QueryError>;

pub struct WeatherQueryController {
    provider: Arc<dyn WeatherProvider>,
    state: QueryState,
    task: Option<JoinHandle<QueryOutcome>>,
}

impl std::fmt::Debug for WeatherQueryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherQueryController")
            .field("provider", &self.provider)
            .field("state", &self.state)
            .field("in_flight", &self.task.is_some())
            .finish()
    }
}

impl WeatherQueryController {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            state: QueryState::default(),
            task: None,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn view(&self) -> QueryView<'_> {
        self.state.view()
    }

    pub fn set_city_input(&mut self, text: impl Into<String>) {
        self.state.set_city_input(text.into());
    }

    /// Start a query for the current input.
    ///
    /// Returns `false` without doing anything while a query is in flight.
    /// Must be called from within a tokio runtime.
    pub fn submit_query(&mut self) -> bool {
        if self.task.is_some() {
            debug!(city = self.state.city_input(), "query already in flight, ignoring submit");
            return false;
        }

        self.state.begin();

        let provider = Arc::clone(&self.provider);
        let city = self.state.city_input().to_string();
        debug!(city = %city, "submitting weather query");

        self.task = Some(tokio::spawn(async move {
            provider.current_weather(&city).await
        }));

        true
    }

    /// Apply the in-flight outcome if it has resolved. Never blocks.
    ///
    /// Returns `true` when the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(handle) = self.task.as_mut() else {
            return false;
        };

        if !handle.is_finished() {
            return false;
        }

        match handle.now_or_never() {
            Some(joined) => {
                self.task = None;
                self.apply(joined);
                true
            }
            None => {
                warn!("query task not ready despite is_finished()");
                false
            }
        }
    }

    /// Wait for the in-flight query, if any, and apply its outcome.
    ///
    /// Returns `false` when nothing was in flight. Dropping the returned
    /// future leaves the query running.
    pub async fn wait(&mut self) -> bool {
        let Some(handle) = self.task.as_mut() else {
            return false;
        };

        let joined = handle.await;
        self.task = None;
        self.apply(joined);
        true
    }

    /// Set the input, submit it and wait for the outcome.
    ///
    /// If a query is already in flight, `city` is discarded: the input is left
    /// untouched and the call waits for the in-flight query instead.
    pub async fn run_query(&mut self, city: impl Into<String>) -> &QueryState {
        if self.task.is_none() {
            self.set_city_input(city);
            self.submit_query();
        }
        self.wait().await;
        &self.state
    }

    fn apply(&mut self, joined: Result<QueryOutcome, JoinError>) {
        let outcome = joined.unwrap_or_else(|err| {
            warn!(error = %err, "weather query task did not complete");
            Err(QueryError::Interrupted)
        });

        match outcome {
            Ok(snapshot) => {
                debug!(location = %snapshot.location_name, "weather query succeeded");
                self.state.succeed(snapshot);
            }
            Err(err) => {
                debug!(error = ?err, "weather query failed");
                self.state.fail(&err);
            }
        }
    }
}

impl Drop for WeatherQueryController {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}
