//! Main ProjectionGateway implementation

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::rest_api;

use projection_engine::ProjectionCalculator;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Main ProjectionGateway service
pub struct ProjectionGateway {
    /// Gateway configuration
    config: GatewayConfig,

    /// Shared, immutable projection calculator
    calculator: Arc<ProjectionCalculator>,
}

impl ProjectionGateway {
    /// Create a new ProjectionGateway
    pub fn new(config: GatewayConfig) -> Self {
        let calculator = Arc::new(ProjectionCalculator::new(config.engine.clone()));
        Self { config, calculator }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Install the Prometheus exporter when metrics are enabled
    pub fn install_metrics_exporter(&self) -> GatewayResult<()> {
        if !self.config.metrics.enabled {
            return Ok(());
        }

        let addr = self.config.metrics_addr()?;
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .map_err(|e| GatewayError::Metrics(e.to_string()))?;

        info!("Prometheus exporter listening on {}", addr);
        Ok(())
    }

    /// Serve the REST API until `shutdown` resolves
    ///
    /// Returns once in-flight requests have drained.
    pub async fn run<S>(&self, shutdown: S) -> GatewayResult<SocketAddr>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server_addr()?;
        let routes = rest_api::create_routes(self.calculator.clone(), self.config.server.max_body_bytes);

        let (bound, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown)?;
        info!(
            "ProjectionGateway listening on {} (range policy {:?})",
            bound, self.config.engine.range_policy
        );

        server.await;
        info!("ProjectionGateway stopped");
        Ok(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let mut config = GatewayConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;

        let gateway = ProjectionGateway::new(config);
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            gateway
                .run(async {
                    let _ = rx.await;
                })
                .await
        });

        tx.send(()).unwrap();
        let bound = handle.await.unwrap().unwrap();
        assert_eq!(bound.ip().to_string(), "127.0.0.1");
        assert_ne!(bound.port(), 0);
    }

    #[test]
    fn test_metrics_disabled_is_noop() {
        let gateway = ProjectionGateway::new(GatewayConfig::default());
        assert!(gateway.install_metrics_exporter().is_ok());
    }
}
