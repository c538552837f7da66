//! Observability utilities.

mod logging;
mod timer;

pub use logging::{env_filter, init_tracing};
pub use timer::SpanTimer;
