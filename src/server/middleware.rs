use actix_cors::Cors;
use tracing_actix_web::{DefaultRootSpanBuilder, TracingLogger};

pub type Logger = TracingLogger<DefaultRootSpanBuilder>;

pub fn create_logger() -> Logger {
    TracingLogger::default()
}

/// Any origin, method and header: the service is called from a browser
/// frontend on another port.
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
