/// Convenience result alias used at the crate's fallible boundaries.
pub type StackResult<T> = Result<T, StackError>;

/// Errors raised outside the navigation core.
///
/// Push/pop/render never fail; rejected navigation is a logged no-op. These variants cover
/// configuration loading and driver pool setup.
#[derive(thiserror::Error, Debug)]
pub enum StackError {
    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Background driver pool could not be built.
    #[error("driver error: {0}")]
    Driver(String),

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StackError {
    /// Build a [`StackError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StackError::Driver`].
    pub fn driver(msg: impl Into<String>) -> Self {
        Self::Driver(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
