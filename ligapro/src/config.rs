//! Configuration loaded from environment variables.

use crate::league::models::{PlayoffType, PointsPolicy};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an environment variable, falling back to `default` when it is unset or unparsable
pub fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Settings applied to newly created leagues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueDefaults {
    /// Points for a win
    pub win_points: u32,
    /// Points for a draw
    pub draw_points: u32,
    /// Stored with the league; standings never award it
    pub loss_points: u32,
    /// Roster limit
    pub max_teams: u32,
    /// Legs per playoff fixture
    pub playoff_type: PlayoffType,
}

impl Default for LeagueDefaults {
    fn default() -> Self {
        let points = PointsPolicy::default();
        Self {
            win_points: points.win_points,
            draw_points: points.draw_points,
            loss_points: points.loss_points,
            max_teams: 10,
            playoff_type: PlayoffType::Single,
        }
    }
}

impl LeagueDefaults {
    /// Load league defaults from environment variables
    ///
    /// - `LEAGUE_WIN_POINTS` (default: 3)
    /// - `LEAGUE_DRAW_POINTS` (default: 1)
    /// - `LEAGUE_LOSS_POINTS` (default: 0)
    /// - `LEAGUE_MAX_TEAMS` (default: 10)
    /// - `LEAGUE_PLAYOFF_TYPE`: `single` or `double` (default: `single`)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for an unknown playoff type
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let playoff_type = match std::env::var("LEAGUE_PLAYOFF_TYPE") {
            Ok(value) => value.parse().map_err(|e: crate::league::UnknownTag| ConfigError::Invalid {
                var: "LEAGUE_PLAYOFF_TYPE".to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => defaults.playoff_type,
        };

        Ok(Self {
            win_points: parse_env_or("LEAGUE_WIN_POINTS", defaults.win_points),
            draw_points: parse_env_or("LEAGUE_DRAW_POINTS", defaults.draw_points),
            loss_points: parse_env_or("LEAGUE_LOSS_POINTS", defaults.loss_points),
            max_teams: parse_env_or("LEAGUE_MAX_TEAMS", defaults.max_teams),
            playoff_type,
        })
    }

    /// Validate the loaded values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.draw_points > self.win_points {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_DRAW_POINTS".to_string(),
                reason: format!("Must not exceed win points ({})", self.win_points),
            });
        }

        if self.max_teams == 0 {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_MAX_TEAMS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn points(&self) -> PointsPolicy {
        PointsPolicy {
            win_points: self.win_points,
            draw_points: self.draw_points,
            loss_points: self.loss_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let defaults = LeagueDefaults::default();
        assert!(defaults.validate().is_ok());
        assert_eq!(defaults.points(), PointsPolicy::default());
        assert_eq!(defaults.max_teams, 10);
    }

    #[test]
    fn test_draw_worth_more_than_win_is_rejected() {
        let defaults = LeagueDefaults {
            draw_points: 4,
            ..LeagueDefaults::default()
        };
        let err = defaults.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "LEAGUE_DRAW_POINTS"));
    }

    #[test]
    fn test_zero_max_teams_is_rejected() {
        let defaults = LeagueDefaults {
            max_teams: 0,
            ..LeagueDefaults::default()
        };
        assert!(defaults.validate().is_err());
    }

    #[test]
    fn test_parse_env_or_falls_back() {
        assert_eq!(parse_env_or("LIGAPRO_TEST_SURELY_UNSET_VAR", 7u32), 7);
    }
}
