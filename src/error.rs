use thiserror::Error;

use crate::module::Op;

/// Failure to produce a callable module for a name. Terminal for the mount
/// that requested it until the name is requested again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("no module registered under `{0}`")]
    NotFound(String),

    #[error("failed to initialize {name}: {reason}")]
    Instantiate { name: String, reason: String },
}

/// An operation on a game module failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleFault {
    #[error("operation `{0}` is not exported")]
    Unsupported(Op),

    #[error("module trapped: {0}")]
    Trap(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A load-critical operation is absent from the module.
    #[error("module does not export `{0}`")]
    MissingOperation(Op),

    #[error("state read failed: {0}")]
    StateRead(ModuleFault),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
