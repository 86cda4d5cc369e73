use std::sync::OnceLock;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder (once per process) and register the
/// journal metrics. Returns the handle whose `render()` produces the scrape
/// payload.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            // Pre-register so they appear before the first increment.
            counter!("trades_appended_total").absolute(0);
            counter!("duplicate_rejections_total").absolute(0);
            counter!("storage_read_errors_total").absolute(0);
            counter!("storage_write_errors_total").absolute(0);
            counter!("screenshots_saved_total").absolute(0);
            counter!("screenshots_deleted_total").absolute(0);
            gauge!("journal_rows").set(0.0);

            handle
        })
        .clone()
}
