//! Reception Projection Engine
//!
//! Projects a receiver's receptions for one game from blended recent and
//! season usage rates, then prices a sportsbook line by treating the
//! projection as the mean of a Poisson distribution.
//!
//! The engine is pure: no I/O, no shared state. Every call is a function of
//! its `ProjectionRequest` and the immutable `EngineConfig`.

pub mod calculator;
pub mod config;
pub mod error;
pub mod models;
pub mod poisson;

pub use calculator::{project_receptions, ProjectionCalculator};
pub use config::{EngineConfig, RangePolicy};
pub use error::{ProjectionError, Result};
pub use models::*;

/// Weight of the trailing-3-game routes in the routes blend
pub const ROUTES_RECENT_WEIGHT: f64 = 0.6;

/// Weight of the season routes in the routes blend
pub const ROUTES_SEASON_WEIGHT: f64 = 0.4;

/// Weight of the trailing-4-game TPRR in the target-rate blend
pub const TPRR_RECENT_WEIGHT: f64 = 0.6;

/// Weight of the season TPRR in the target-rate blend
pub const TPRR_SEASON_WEIGHT: f64 = 0.4;

/// Weight of the season catch rate in the catch-rate blend
pub const CATCH_RATE_SEASON_WEIGHT: f64 = 0.7;

/// Weight of the trailing-4-game catch rate in the catch-rate blend
pub const CATCH_RATE_RECENT_WEIGHT: f64 = 0.3;
