pub type StagecastResult<T> = Result<T, StagecastError>;

#[derive(thiserror::Error, Debug)]
pub enum StagecastError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StagecastError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(StagecastError::parse("x").to_string().contains("parse error:"));
        assert!(
            StagecastError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            StagecastError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = StagecastError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
