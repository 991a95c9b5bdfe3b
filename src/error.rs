use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("no connector available: {0}")]
    DirectoryUnavailable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl SimError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimError::Transport(_) | SimError::Decode(_))
    }
}

impl From<reqwest::Error> for SimError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SimError::Decode(e.to_string())
        } else {
            SimError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_recoverable() {
        assert!(SimError::Transport("x".into()).is_recoverable());
        assert!(SimError::Decode("x".into()).is_recoverable());
        assert!(!SimError::DirectoryUnavailable("x".into()).is_recoverable());
        assert!(!SimError::InvalidConfiguration("x".into()).is_recoverable());
    }

    #[test]
    fn json_errors_map_to_decode() {
        let err: SimError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, SimError::Decode(_)));
    }
}
