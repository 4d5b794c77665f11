//! Internal telemetry: tracing setup, component health, process metrics.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::{health, ComponentHealth, HealthReport, HealthRegistry, HealthStatus};
pub use metrics::{metrics, Counter, Gauge, Histogram, Metrics};
pub use tracing_setup::{init_tracing, init_tracing_from_env, TracingConfig};
