//! Domain error types.

/// Top-level error type for frontier.
#[derive(Debug, thiserror::Error)]
pub enum FrontierError {
    #[error("data load error: {reason}")]
    DataLoad { reason: String },

    #[error("insufficient data: have {rows} aligned price rows, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("singular covariance matrix: {reason}")]
    SingularCovariance { reason: String },

    #[error("degenerate frontier: {reason}")]
    DegenerateFrontier { reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FrontierError> for std::process::ExitCode {
    fn from(err: &FrontierError) -> Self {
        let code: u8 = match err {
            FrontierError::Io(_) => 1,
            FrontierError::ConfigParse { .. }
            | FrontierError::ConfigInvalid { .. }
            | FrontierError::InvalidParameter { .. } => 2,
            FrontierError::DataLoad { .. } => 3,
            FrontierError::InsufficientData { .. } => 5,
            FrontierError::SingularCovariance { .. } | FrontierError::DegenerateFrontier { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
