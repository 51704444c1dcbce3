//! Observability setup for DocLens: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
