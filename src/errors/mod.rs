use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Parse Error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config Parse Error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Config Serialize Error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation Error: {0}")]
    Validation(String),
    #[error("Value Parse Error: {0}")]
    ValueParse(#[from] std::num::ParseFloatError),
    #[error("Task Error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AnalyzerError::Validation("avg_damping exceeds max_damping".to_string());
        assert_eq!(error.to_string(), "Validation Error: avg_damping exceeds max_damping");
    }

    #[test]
    fn test_value_parse_conversion() {
        let err: AnalyzerError = "abc".parse::<f64>().unwrap_err().into();
        assert!(err.to_string().starts_with("Value Parse Error"));
    }
}
