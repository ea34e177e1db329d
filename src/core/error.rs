use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Playbook has no entries")]
    EmptyPlaybook,

    #[error("Playbook entry {index} moves both forward and back")]
    ConflictingMovement { index: usize },

    #[error("Playbook set has {found} levels, expected {expected}")]
    PlaybookSetSize { expected: usize, found: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Non-finite simulation state: {0}")]
    NonFiniteState(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
