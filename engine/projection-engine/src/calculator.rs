use tracing::debug;

use crate::config::{EngineConfig, RangePolicy};
use crate::error::{ProjectionError, Result};
use crate::models::*;
use crate::poisson::{poisson_cdf, survival_from_cdf};
use crate::{
    CATCH_RATE_RECENT_WEIGHT, CATCH_RATE_SEASON_WEIGHT, ROUTES_RECENT_WEIGHT,
    ROUTES_SEASON_WEIGHT, TPRR_RECENT_WEIGHT, TPRR_SEASON_WEIGHT,
};

/// Project receptions with the default configuration
pub fn project_receptions(request: &ProjectionRequest) -> Result<ProjectionResult> {
    ProjectionCalculator::default().project(request)
}

/// Reception projection calculator
///
/// Holds only immutable configuration, so a single instance can be shared
/// across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ProjectionCalculator {
    config: EngineConfig,
}

impl ProjectionCalculator {
    /// Create a new projection calculator
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check a request against the mandatory rules and the range policy
    pub fn validate(&self, request: &ProjectionRequest) -> Result<()> {
        for (field, value) in request.fields() {
            if !value.is_finite() {
                return Err(ProjectionError::invalid_field(field, value, "must be a finite number"));
            }
        }

        if request.line < 0.0 {
            return Err(ProjectionError::invalid_field("line", request.line, "must be non-negative"));
        }

        if self.config.range_policy == RangePolicy::Strict {
            for (field, value) in [
                ("routes_l3", request.routes_l3),
                ("routes_season", request.routes_season),
            ] {
                if value < 0.0 {
                    return Err(ProjectionError::invalid_field(field, value, "must be non-negative"));
                }
            }

            for (field, value) in [
                ("tprr_l4", request.tprr_l4),
                ("tprr_season", request.tprr_season),
                ("catch_rate_season", request.catch_rate_season),
                ("catch_rate_l4", request.catch_rate_l4),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ProjectionError::invalid_field(field, value, "must be within [0, 1]"));
                }
            }

            if request.matchup_factor < 0.0 {
                return Err(ProjectionError::invalid_field(
                    "matchup_factor",
                    request.matchup_factor,
                    "must be non-negative",
                ));
            }
        }

        Ok(())
    }

    /// Compute every intermediate of the projection without rounding
    ///
    /// λ is returned as computed. Under `RangePolicy::PassThrough` a negative
    /// matchup factor yields λ < 0, which is not a valid Poisson rate; the
    /// probability is still evaluated and clamped to [0, 1]. When λ is so
    /// negative that the sum itself breaks down (e^{-λ} overflows), the
    /// request is rejected instead.
    pub fn breakdown(&self, request: &ProjectionRequest) -> Result<ProjectionBreakdown> {
        if let Err(e) = self.validate(request) {
            debug!("Rejected projection request: {}", e);
            return Err(e);
        }

        // Blend recent usage with the season baseline
        let routes_proj =
            ROUTES_RECENT_WEIGHT * request.routes_l3 + ROUTES_SEASON_WEIGHT * request.routes_season;
        let tprr_proj =
            TPRR_RECENT_WEIGHT * request.tprr_l4 + TPRR_SEASON_WEIGHT * request.tprr_season;
        let targets_proj = routes_proj * tprr_proj;

        // Catch rate leans on the season sample
        let catch_rate_proj = CATCH_RATE_SEASON_WEIGHT * request.catch_rate_season
            + CATCH_RATE_RECENT_WEIGHT * request.catch_rate_l4;

        let lambda = targets_proj * catch_rate_proj * request.matchup_factor;
        if !lambda.is_finite() {
            let err = ProjectionError::InvalidInput(format!(
                "projection overflowed to {} for the supplied inputs",
                lambda
            ));
            debug!("Rejected projection request: {}", err);
            return Err(err);
        }

        let floor_line = request.line.floor() as u64;
        let cdf = poisson_cdf(lambda, floor_line);
        let over_probability = survival_from_cdf(cdf);
        if !cdf.is_finite() || !over_probability.is_finite() {
            let err = ProjectionError::InvalidInput(format!(
                "over probability is undefined for projection {} (negative matchup_factor {} is not a valid Poisson rate)",
                lambda, request.matchup_factor
            ));
            debug!("Rejected projection request: {}", err);
            return Err(err);
        }

        debug!(
            "Projected receptions: routes {:.3}, tprr {:.4}, targets {:.4}, catch rate {:.4}, lambda {:.4}, L {}, P(over) {:.4}",
            routes_proj, tprr_proj, targets_proj, catch_rate_proj, lambda, floor_line, over_probability
        );

        Ok(ProjectionBreakdown {
            routes_proj,
            tprr_proj,
            targets_proj,
            catch_rate_proj,
            lambda,
            floor_line,
            cdf,
            over_probability,
        })
    }

    /// Project receptions and the over probability, rounded for output
    pub fn project(&self, request: &ProjectionRequest) -> Result<ProjectionResult> {
        let breakdown = self.breakdown(request)?;
        Ok(self.finalize(&breakdown))
    }

    /// Round a breakdown into the public result
    pub fn finalize(&self, breakdown: &ProjectionBreakdown) -> ProjectionResult {
        ProjectionResult {
            projection: round_to(breakdown.lambda, self.config.projection_decimals),
            over_probability: round_to(breakdown.over_probability, self.config.probability_decimals),
        }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
