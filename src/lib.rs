pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod journal;
pub mod metrics;
pub mod models;

use std::sync::{Arc, Mutex};

use crate::config::AppConfig;
use crate::journal::Journal;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// One action at a time: the journal is a single-writer file.
    pub journal: Arc<Mutex<Journal>>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        journal: Journal,
        metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            config,
            journal: Arc::new(Mutex::new(journal)),
            metrics_handle,
        }
    }
}
