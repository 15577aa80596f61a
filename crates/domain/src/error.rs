//! Common error types used across the workspace.
//!
//! Each failure family has its own typed enum. [`EndScriptsError`] wraps the
//! request-level ones with `#[from]` conversions so the application layer can
//! propagate them with `?`. Adapters box their own errors into
//! [`EndScriptsError::Storage`] or [`EndScriptsError::Device`].
//!
//! [`ValidationError`] and [`FormatError`] never cross a port: a rejected
//! entry is dropped and a template that fails to render is reported through a
//! notification.

/// Top-level error returned across port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum EndScriptsError {
    /// A front-end request was malformed.
    #[error(transparent)]
    BadRequest(#[from] BadRequestError),

    /// A front-end request named something that does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The configuration backend failed to load or persist scripts.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The device command interface rejected a dispatch.
    #[error("device error")]
    Device(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a raw script entry is rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("scripts must be a list")]
    NotAList,

    #[error("script must be a mapping")]
    NotAMapping,

    #[error("bad 'name' key")]
    InvalidName,

    #[error("bad 'commands' key")]
    InvalidCommands,

    #[error("no command provided")]
    NoCommands,

    #[error("bad 'delay' key")]
    InvalidDelay,
}

/// Errors for malformed front-end requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BadRequestError {
    #[error("missing 'command' field")]
    MissingCommand,

    #[error("missing 'scripts' field")]
    MissingScripts,

    #[error("'index' must be a non-negative integer")]
    InvalidIndex,

    #[error("index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The requested resource or command does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} not found: {name}")]
pub struct NotFoundError {
    pub kind: &'static str,
    pub name: String,
}

/// Failures while rendering a command template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unknown placeholder '{0}'")]
    UnknownPlaceholder(String),

    #[error("unknown conversion '!{0}'")]
    InvalidConversion(String),

    #[error("invalid format spec '{0}' for a text value")]
    InvalidFormatSpec(String),

    #[error("unclosed '{{' at byte {0}")]
    UnclosedBrace(usize),

    #[error("single '}}' encountered at byte {0}")]
    UnmatchedClosingBrace(usize),
}
