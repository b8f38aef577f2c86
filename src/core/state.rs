use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::grading::GradingConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    grading: GradingConfig,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool) -> Self {
        let grading = GradingConfig::from_settings(&settings);
        Self { inner: Arc::new(InnerState { settings, db, grading }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn grading(&self) -> &GradingConfig {
        &self.inner.grading
    }
}
