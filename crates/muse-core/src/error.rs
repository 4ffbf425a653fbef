use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn missing_config(what: impl Into<String>) -> Self {
        Self::MissingConfig(what.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_message() {
        let err = Error::missing_config("OPENAI_API_KEY is not set");
        assert_eq!(err.to_string(), "Missing required config: OPENAI_API_KEY is not set");
    }

    #[test]
    fn test_io_error_converts() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "muse.toml").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
