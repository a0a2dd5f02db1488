use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkycastError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not parse configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Could not serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Page is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    // Dispatch errors
    #[error("Unknown verb: {0}")]
    UnknownVerb(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown formatter: {0}")]
    UnknownFormatter(String),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Attempts have been exhausted, configuration was aborted")]
    ConfigurationAborted,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SkycastResult<T> = Result<T, SkycastError>;
