use crate::config::Config;
use crate::interview::chain::InterviewChain;
use crate::interview::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless driver shared by every session; owns the generator and chain settings.
    pub chain: InterviewChain,
    pub sessions: SessionStore,
    pub config: Config,
}
