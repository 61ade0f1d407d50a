pub type DeployResult<T> = Result<T, DeployError>;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// `code` is `None` when the process was terminated by a signal.
    #[error("command failed: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
