use thiserror::Error;

#[derive(Error, Debug)]
pub enum TapZoneError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Trial {trial} is already in progress")]
    TrialInProgress { trial: u32 },

    #[error("No trial is in progress")]
    NoActiveTrial,

    #[error("Target set is empty")]
    NoTargets,
}

impl TapZoneError {
    /// Invalid-call errors leave the engine untouched and are safe to ignore.
    pub fn is_invalid_call(&self) -> bool {
        matches!(
            self,
            TapZoneError::TrialInProgress { .. } | TapZoneError::NoActiveTrial | TapZoneError::NoTargets
        )
    }
}

pub type TzResult<T> = Result<T, TapZoneError>;
