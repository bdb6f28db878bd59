use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeafpressError {
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Shortcode already registered: [{0}]")]
    DuplicateShortcode(String),

    #[error("Setting already defined: {0}")]
    DuplicateSetting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, LeafpressError>;
