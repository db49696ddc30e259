use serde::{Deserialize, Serialize};

/// Usage and efficiency inputs for one receiver projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionRequest {
    /// Routes run, trailing 3 games
    pub routes_l3: f64,

    /// Routes run, season average
    pub routes_season: f64,

    /// Targets per route run, trailing 4 games
    pub tprr_l4: f64,

    /// Targets per route run, season
    pub tprr_season: f64,

    /// Season catch rate
    pub catch_rate_season: f64,

    /// Trailing-4-game catch rate
    pub catch_rate_l4: f64,

    /// Multiplicative defensive adjustment, 1.0 is neutral
    pub matchup_factor: f64,

    /// Sportsbook receptions line (e.g., 4.5)
    pub line: f64,
}

/// Rounded projection returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Expected receptions, 2 decimals
    pub projection: f64,

    /// P(receptions > floor(line)), 3 decimals
    pub over_probability: f64,
}

/// Unrounded intermediates of a single projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionBreakdown {
    pub routes_proj: f64,
    pub tprr_proj: f64,
    pub targets_proj: f64,
    pub catch_rate_proj: f64,
    /// Poisson rate, i.e. the raw projection
    pub lambda: f64,
    pub floor_line: u64,
    pub cdf: f64,
    pub over_probability: f64,
}

impl ProjectionRequest {
    /// All fields paired with their wire names, in declaration order
    pub fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("routes_l3", self.routes_l3),
            ("routes_season", self.routes_season),
            ("tprr_l4", self.tprr_l4),
            ("tprr_season", self.tprr_season),
            ("catch_rate_season", self.catch_rate_season),
            ("catch_rate_l4", self.catch_rate_l4),
            ("matchup_factor", self.matchup_factor),
            ("line", self.line),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_all_fields() {
        let json = r#"{
            "routes_l3": 20, "routes_season": 18.0,
            "tprr_l4": 0.22, "tprr_season": 0.20,
            "catch_rate_season": 0.75, "catch_rate_l4": 0.70,
            "matchup_factor": 1.0, "line": 4.5
        }"#;

        let request: ProjectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.routes_l3, 20.0);
        assert_eq!(request.line, 4.5);
    }

    #[test]
    fn test_request_rejects_missing_field() {
        let json = r#"{
            "routes_l3": 20, "routes_season": 18,
            "tprr_l4": 0.22, "tprr_season": 0.20,
            "catch_rate_season": 0.75, "catch_rate_l4": 0.70,
            "matchup_factor": 1.0
        }"#;

        let err = serde_json::from_str::<ProjectionRequest>(json).unwrap_err();
        assert!(err.to_string().contains("line"));
    }

    #[test]
    fn test_request_rejects_non_numeric_and_unknown_fields() {
        let non_numeric = r#"{
            "routes_l3": "twenty", "routes_season": 18,
            "tprr_l4": 0.22, "tprr_season": 0.20,
            "catch_rate_season": 0.75, "catch_rate_l4": 0.70,
            "matchup_factor": 1.0, "line": 4.5
        }"#;
        assert!(serde_json::from_str::<ProjectionRequest>(non_numeric).is_err());

        let unknown = r#"{
            "routes_l3": 20, "routes_season": 18,
            "tprr_l4": 0.22, "tprr_season": 0.20,
            "catch_rate_season": 0.75, "catch_rate_l4": 0.70,
            "matchup_factor": 1.0, "line": 4.5, "player": "x"
        }"#;
        assert!(serde_json::from_str::<ProjectionRequest>(unknown).is_err());
    }

    #[test]
    fn test_result_serializes_exactly_two_keys() {
        let result = ProjectionResult { projection: 2.99, over_probability: 0.176 };
        let value = serde_json::to_value(result).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["projection"], 2.99);
        assert_eq!(object["over_probability"], 0.176);
    }
}
