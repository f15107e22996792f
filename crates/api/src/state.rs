use std::sync::Arc;

use escriba_auth::Authenticator;
use escriba_orchestrator::Scribe;

/// Shared application state: the auth service and the conversation
/// orchestrator. No per-user mutable state survives between requests.
#[derive(Clone)]
pub struct AppState {
    authenticator: Authenticator,
    scribe: Arc<Scribe>,
}

impl AppState {
    pub fn new(authenticator: Authenticator, scribe: Arc<Scribe>) -> Self {
        Self {
            authenticator,
            scribe,
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn scribe(&self) -> &Scribe {
        &self.scribe
    }
}
