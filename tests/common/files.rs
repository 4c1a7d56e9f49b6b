use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Unique log path under the system temp dir.
pub fn log_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("async-connector-it-{name}-{}.log", uuid::Uuid::new_v4()));
    path
}
