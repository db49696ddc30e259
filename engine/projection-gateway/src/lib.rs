//! ProjectionGateway - REST API for reception projections
//!
//! Wraps the projection engine in a warp HTTP service: JSON in, JSON out,
//! with configuration, structured logging, Prometheus metrics and graceful
//! shutdown around it.

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod rest_api;
pub mod signals;

pub use config::{load_config, GatewayConfig};
pub use error::{GatewayError, GatewayResult};
pub use gateway::ProjectionGateway;
pub use logging::initialize_logging;
pub use signals::{setup_signal_handlers, wait_for_shutdown};

/// Version of the ProjectionGateway API
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;
