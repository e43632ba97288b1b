//! Continuous mode: repeat sync attempts on a fixed interval until shut down.

mod error;
pub mod logging;
mod runtime;

pub use error::DaemonError;
pub use logging::init_tracing;
pub use runtime::{run, run_loop, start_blocking};
