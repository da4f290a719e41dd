//! Observable forecast state for presentation layers.
//!
//! [`WeatherController`] owns a single [`WeatherUiState`] and publishes every
//! transition through a [`tokio::sync::watch`] channel. Subscribers always see
//! whole snapshots; slow subscribers only see the latest one.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{model::WeatherForecast, network::NetworkResult, provider::WeatherRepository};

pub const TOKYO_LATITUDE: f64 = 35.6892;
pub const TOKYO_LONGITUDE: f64 = 139.6917;

/// Shown when a failure carries no message of its own.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Snapshot rendered by the UI. Both `forecast` and `error` may be set at the
/// same time: a failed refresh keeps the previously loaded forecast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherUiState {
    pub is_loading: bool,
    pub forecast: Option<WeatherForecast>,
    pub error: Option<String>,
}

impl WeatherUiState {
    /// Refresh started: the error is cleared, a stale forecast stays visible.
    pub fn loading(&self) -> Self {
        Self {
            is_loading: true,
            error: None,
            ..self.clone()
        }
    }

    pub fn loaded(&self, forecast: WeatherForecast) -> Self {
        Self {
            is_loading: false,
            forecast: Some(forecast),
            ..self.clone()
        }
    }

    pub fn failed(&self, message: Option<String>) -> Self {
        Self {
            is_loading: false,
            error: Some(message.unwrap_or_else(|| GENERIC_ERROR.to_string())),
            ..self.clone()
        }
    }

    pub fn has_forecast(&self) -> bool {
        self.forecast.is_some()
    }

    /// Not loading, and at least one fetch has produced a forecast or an error.
    pub fn is_settled(&self) -> bool {
        !self.is_loading && (self.has_forecast() || self.error.is_some())
    }
}

/// Owns the UI state and runs fetches against an injected repository.
///
/// Fetches are not serialized: overlapping calls each publish their own
/// outcome and the one that finishes last wins. Dropping the controller
/// cancels every fetch still in flight; a cancelled fetch publishes nothing.
#[derive(Debug)]
pub struct WeatherController {
    repository: Arc<dyn WeatherRepository>,
    state: Arc<watch::Sender<WeatherUiState>>,
    cancel: CancellationToken,
}

impl WeatherController {
    /// Create a controller and start fetching the Tokyo forecast.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(repository: Arc<dyn WeatherRepository>) -> Self {
        let controller = Self::idle(repository);
        controller.fetch_tokyo_weather();
        controller
    }

    /// Create a controller whose initial fetch targets the given coordinates.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_initial_location(
        repository: Arc<dyn WeatherRepository>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        let controller = Self::idle(repository);
        controller.fetch_weather(latitude, longitude);
        controller
    }

    fn idle(repository: Arc<dyn WeatherRepository>) -> Self {
        let (state, _) = watch::channel(WeatherUiState::default());
        Self {
            repository,
            state: Arc::new(state),
            cancel: CancellationToken::new(),
        }
    }

    /// Receive every published snapshot. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<WeatherUiState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> WeatherUiState {
        self.state.borrow().clone()
    }

    pub fn fetch_tokyo_weather(&self) -> JoinHandle<()> {
        self.fetch_weather(TOKYO_LATITUDE, TOKYO_LONGITUDE)
    }

    /// Start a fetch in the background. The handle completes once the outcome
    /// has been published, or the fetch was cancelled.
    pub fn fetch_weather(&self, latitude: f64, longitude: f64) -> JoinHandle<()> {
        let repository = Arc::clone(&self.repository);
        let state = Arc::clone(&self.state);
        let cancel = self.cancel.clone();
        let span = info_span!("fetch_weather", lat = %latitude, lon = %longitude);

        tokio::spawn(
            async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => debug!("fetch cancelled"),
                    _ = run_fetch(repository.as_ref(), &state, &cancel, latitude, longitude) => {}
                }
            }
            .instrument(span),
        )
    }
}

impl Drop for WeatherController {
    fn drop(&mut self) {
        // Cancel under the state lock so no publication straddles teardown.
        self.state.send_if_modified(|_| {
            self.cancel.cancel();
            false
        });
    }
}

async fn run_fetch(
    repository: &dyn WeatherRepository,
    state: &watch::Sender<WeatherUiState>,
    cancel: &CancellationToken,
    latitude: f64,
    longitude: f64,
) {
    publish(state, cancel, WeatherUiState::loading);

    match repository.get_weather_data(latitude, longitude).await {
        NetworkResult::Success { data } => {
            if publish(state, cancel, |s| s.loaded(data)) {
                info!("published forecast");
            }
        }
        NetworkResult::Failure {
            status_code,
            message,
        } => {
            warn!(?status_code, ?message, "fetch failed");
            publish(state, cancel, |s| s.failed(message));
        }
    }
}

/// Replace the state with `next(current)` unless the controller has been
/// dropped. Returns whether anything was published.
fn publish(
    state: &watch::Sender<WeatherUiState>,
    cancel: &CancellationToken,
    next: impl FnOnce(&WeatherUiState) -> WeatherUiState,
) -> bool {
    let published = state.send_if_modified(|current| {
        if cancel.is_cancelled() {
            return false;
        }
        *current = next(current);
        true
    });
    if !published {
        debug!("controller dropped, outcome discarded");
    }
    published
}
