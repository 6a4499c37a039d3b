/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - subscription store, session decoder, translator, runtime mode
 * - Cloned per request, so everything inside is Arc / Copy
 */
use std::sync::Arc;

use crate::config::AppEnv;
use crate::repos::subscription_repo::SubscriptionStore;
use crate::services::{auth::SessionDecoder, i18n::Translator};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubscriptionStore>,
    pub sessions: Arc<SessionDecoder>,
    pub translator: Translator,
    pub app_env: AppEnv,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .field("sessions", &self.sessions)
            .field("translator", &self.translator)
            .field("app_env", &self.app_env)
            .finish()
    }
}

impl AppState {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        sessions: Arc<SessionDecoder>,
        translator: Translator,
        app_env: AppEnv,
    ) -> Self {
        Self {
            store,
            sessions,
            translator,
            app_env,
        }
    }

    /// Message shown to users/logs for a failure: localized text in production,
    /// the raw error otherwise.
    pub fn failure_message(&self, key: &str, err: &dyn std::error::Error) -> String {
        if self.app_env.is_production() {
            self.translator.t(key).to_string()
        } else {
            err.to_string()
        }
    }
}
