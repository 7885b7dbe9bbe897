//! Draft configuration.
//!
//! Supports a JSON file and environment variable overrides. Policy such as
//! accelerated test timelines lives here and is handed to the scheduler as an
//! explicit `ScheduleOptions` value.

use std::path::Path;

use chrono::{DateTime, Datelike, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::parser::parse_timestamp;
use crate::schedule::{
    CivilClock, RotationPlan, ScheduleOptions, ANCHOR_HOUR, CIVIL_TIMEZONE,
    DEFAULT_TURN_DURATION_HOURS,
};

/// Longest accepted turn: one whole season
pub const MAX_TURN_DURATION_MINUTES: i64 = 366 * 24 * 60;

/// Draft configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Season being drafted. Defaults to the current civil year.
    pub season_year: Option<i32>,
    /// IANA name of the civil timezone deadlines are anchored in.
    pub timezone: String,
    /// Daily boundary hour in that timezone.
    pub anchor_hour: u32,
    /// Turn length override, e.g. 10 for staging timelines.
    pub turn_duration_minutes: Option<i64>,
    /// Season start override.
    pub season_start: Option<DateTime<Utc>>,
    /// Disable boundary snapping. Never enable for real deadlines.
    pub bypass_anchor: bool,
    /// Roster and historical orders.
    pub rotation: RotationPlan,
    /// Path to the action log CSV.
    pub action_log: String,
    /// JSON service settings.
    pub server: ServerConfig,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            season_year: None,
            timezone: CIVIL_TIMEZONE.name().to_string(),
            anchor_hour: ANCHOR_HOUR,
            turn_duration_minutes: None,
            season_start: None,
            bypass_anchor: false,
            rotation: RotationPlan::default(),
            action_log: "data/actions.csv".to_string(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl DraftConfig {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (`DRAFT_CONFIG`, default `draft.json`)
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("DRAFT_CONFIG").unwrap_or_else(|_| "draft.json".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides. Unparseable values are ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(year) = std::env::var("DRAFT_SEASON_YEAR") {
            match year.parse() {
                Ok(y) => self.season_year = Some(y),
                Err(_) => warn!("Ignoring DRAFT_SEASON_YEAR={:?}", year),
            }
        }

        if let Ok(minutes) = std::env::var("DRAFT_TURN_MINUTES") {
            match minutes.parse() {
                Ok(m) => self.turn_duration_minutes = Some(m),
                Err(_) => warn!("Ignoring DRAFT_TURN_MINUTES={:?}", minutes),
            }
        }

        if let Ok(start) = std::env::var("DRAFT_SEASON_START") {
            match parse_timestamp(&start) {
                Some(s) => self.season_start = Some(s),
                None => warn!("Ignoring DRAFT_SEASON_START={:?}", start),
            }
        }

        if let Ok(path) = std::env::var("DRAFT_ACTION_LOG") {
            self.action_log = path;
        }

        if let Ok(tz) = std::env::var("DRAFT_TIMEZONE") {
            self.timezone = tz;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let clock = self.clock()?;
        if let Some(year) = self.season_year {
            checked_season_year(&clock, year)?;
        }
        self.turn_duration()?;
        Ok(())
    }

    fn turn_duration(&self) -> Result<Duration, ConfigError> {
        let minutes = self
            .turn_duration_minutes
            .unwrap_or(DEFAULT_TURN_DURATION_HOURS * 60);
        if !(1..=MAX_TURN_DURATION_MINUTES).contains(&minutes) {
            return Err(ConfigError::InvalidTurnDuration(minutes));
        }
        Ok(Duration::minutes(minutes))
    }

    pub fn clock(&self) -> Result<CivilClock, ConfigError> {
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))?;
        if self.anchor_hour > 23 {
            return Err(ConfigError::InvalidAnchorHour(self.anchor_hour));
        }
        Ok(CivilClock::new(timezone, self.anchor_hour))
    }

    /// Season year in effect at `now`
    pub fn season_year_at(&self, now: DateTime<Utc>) -> Result<i32, ConfigError> {
        let clock = self.clock()?;
        match self.season_year {
            Some(year) => checked_season_year(&clock, year),
            None => Ok(now.with_timezone(&clock.timezone).year()),
        }
    }

    /// Scheduler options for the season in effect at `now`
    pub fn schedule_options(&self, now: DateTime<Utc>) -> Result<ScheduleOptions, ConfigError> {
        let mut options = ScheduleOptions::new(self.season_year_at(now)?)
            .with_clock(self.clock()?)
            .with_turn_duration(self.turn_duration()?)
            .with_bypass_anchor(self.bypass_anchor);
        if let Some(start) = self.season_start {
            options = options.with_season_start(start);
        }
        Ok(options)
    }

    /// Draft order for the season in effect at `now`
    pub fn rotation_order(&self, now: DateTime<Utc>) -> Result<Vec<String>, ConfigError> {
        Ok(self.rotation.rotation_order(self.season_year_at(now)?))
    }
}

fn checked_season_year(clock: &CivilClock, year: i32) -> Result<i32, ConfigError> {
    // A whole year of turns must fit after the opening
    let next = year.checked_add(1).ok_or(ConfigError::InvalidSeasonYear(year))?;
    match (clock.season_opening(year), clock.season_opening(next)) {
        (Some(_), Some(_)) => Ok(year),
        _ => Err(ConfigError::InvalidSeasonYear(year)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = DraftConfig::default();
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.anchor_hour, 10);
        assert!(!config.bypass_anchor);
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let options = config.schedule_options(now).unwrap();
        assert_eq!(options.season_year, 2025);
        assert_eq!(options.turn_duration, Duration::hours(48));
        assert_eq!(options.season_start, None);
    }

    #[test]
    fn test_season_year_follows_civil_calendar() {
        let config = DraftConfig::default();
        // 2025-01-01 02:00Z is still New Year's Eve in New York
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(config.season_year_at(now).unwrap(), 2024);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "season_year": 2026,
            "timezone": "Europe/Berlin",
            "turn_duration_minutes": 10,
            "season_start": "2026-02-01T09:00:00Z",
            "bypass_anchor": true,
            "rotation": {
                "base_year": 2024,
                "participants": ["A", "B", "C"],
                "overrides": { "2025": ["C", "B", "A"] }
            },
            "server": { "port": 9000 }
        }"#;

        let config: DraftConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.anchor_hour, 10);

        let now = Utc::now();
        let options = config.schedule_options(now).unwrap();
        assert_eq!(options.season_year, 2026);
        assert_eq!(options.turn_duration, Duration::minutes(10));
        assert!(options.bypass_anchor);
        assert_eq!(options.clock.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(options.season_start(), Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap());

        assert_eq!(config.rotation.rotation_order(2025), vec!["C", "B", "A"]);
        assert_eq!(config.rotation_order(now).unwrap(), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = DraftConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..DraftConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::UnknownTimezone(_))));

        config.timezone = "UTC".to_string();
        config.anchor_hour = 24;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidAnchorHour(24))));

        config.anchor_hour = 10;
        config.turn_duration_minutes = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTurnDuration(0))));
    }

    #[test]
    fn test_turn_duration_upper_bound() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut config = DraftConfig {
            season_year: Some(2025),
            turn_duration_minutes: Some(200_000_000_000),
            ..DraftConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTurnDuration(200_000_000_000))
        ));
        assert!(matches!(
            config.schedule_options(now),
            Err(ConfigError::InvalidTurnDuration(_))
        ));

        config.turn_duration_minutes = Some(MAX_TURN_DURATION_MINUTES);
        assert!(config.validate().is_ok());
        let options = config.schedule_options(now).unwrap();
        assert_eq!(options.turn_duration, Duration::days(366));
    }

    #[test]
    fn test_season_year_outside_calendar() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut config = DraftConfig {
            season_year: Some(300_000),
            ..DraftConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSeasonYear(300_000))));
        assert!(matches!(
            config.schedule_options(now),
            Err(ConfigError::InvalidSeasonYear(300_000))
        ));
        assert!(config.rotation_order(now).is_err());

        config.season_year = Some(i32::MIN);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSeasonYear(_))));
    }

    #[test]
    fn test_env_overrides() {
        // Only this test touches DRAFT_* variables
        let vars = [
            ("DRAFT_SEASON_YEAR", "2027"),
            ("DRAFT_TURN_MINUTES", "15"),
            ("DRAFT_SEASON_START", "2027-03-01T15:00:00Z"),
            ("DRAFT_ACTION_LOG", "/tmp/actions.csv"),
            ("DRAFT_TIMEZONE", "Europe/Berlin"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let mut config = DraftConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.season_year, Some(2027));
        assert_eq!(config.turn_duration_minutes, Some(15));
        assert_eq!(
            config.season_start,
            Some(Utc.with_ymd_and_hms(2027, 3, 1, 15, 0, 0).unwrap())
        );
        assert_eq!(config.action_log, "/tmp/actions.csv");
        assert_eq!(config.timezone, "Europe/Berlin");

        // Unparseable values leave the previous setting alone
        std::env::set_var("DRAFT_SEASON_YEAR", "next year");
        std::env::set_var("DRAFT_TURN_MINUTES", "ten");
        std::env::set_var("DRAFT_SEASON_START", "soon");
        let mut config = DraftConfig {
            season_year: Some(2025),
            turn_duration_minutes: Some(30),
            ..DraftConfig::default()
        };
        config.apply_env_overrides();

        assert_eq!(config.season_year, Some(2025));
        assert_eq!(config.turn_duration_minutes, Some(30));
        assert_eq!(config.season_start, None);

        for (key, _) in vars {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_missing_file() {
        let err = DraftConfig::from_file("/nonexistent/draft.json").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(..)));
    }
}
