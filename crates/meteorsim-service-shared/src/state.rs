//! Application state for the HTTP services.

use std::sync::Arc;

use meteorsim_lib::{ImpactEngine, Result};

/// Shared application state for axum handlers.
///
/// Cheaply cloneable (`Arc` internally); share via axum's `State`
/// extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{extract::State, routing::post, Router};
/// use meteorsim_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let locations = state.engine().reference_locations();
///     // ...
/// }
///
/// let state = AppState::from_env().unwrap();
/// let app = Router::new()
///     .route("/api/v1/impact/simulate", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    engine: Arc<ImpactEngine>,
}

impl AppState {
    /// Build the engine from the environment (catalog base URL, API key,
    /// optional crater-calculator endpoint).
    pub fn from_env() -> Result<Self> {
        let engine = ImpactEngine::from_env()?;
        tracing::info!(
            locations = engine.reference_locations().len(),
            "impact engine initialized"
        );
        Ok(Self::from_engine(engine))
    }

    /// Wrap a pre-built engine; used by tests.
    pub fn from_engine(engine: ImpactEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Access the impact engine.
    pub fn engine(&self) -> &ImpactEngine {
        &self.engine
    }

    /// Arc handle to the engine, for moving into blocking tasks.
    pub fn engine_arc(&self) -> Arc<ImpactEngine> {
        Arc::clone(&self.engine)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("locations", &self.engine.reference_locations().len())
            .finish()
    }
}
