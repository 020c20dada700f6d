pub mod config;
pub mod progress;
pub mod run;
pub mod status;

use tokio::runtime::{Builder, Runtime};

/// Single-threaded runtime for one CLI invocation.
pub fn runtime() -> std::io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}
