/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Anchor hour must be between 0 and 23, got {0}")]
    InvalidAnchorHour(u32),

    #[error("Turn duration must be between 1 minute and 366 days, got {0} minutes")]
    InvalidTurnDuration(i64),

    #[error("Season year {0} is outside the supported calendar")]
    InvalidSeasonYear(i32),
}

/// Action log loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ActionLogError {
    #[error("Failed to read action log: {0}")]
    Csv(#[from] csv::Error),

    #[error("Action log has no '{0}' column")]
    MissingColumn(&'static str),
}
