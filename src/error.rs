//! Error types shared by the registry, parser and dispatch loop.

use std::io;

/// Error returned by a command handler. Handlers are free to return any error type.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by the shell engine.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("invalid command key {0:?}: keys must be non-empty, printable and contain no whitespace")]
    InvalidKey(String),

    #[error("command {0:?} has no handler")]
    NilHandler(String),

    #[error("command already exists: {0}")]
    DuplicateKey(String),

    #[error("command does not exist: {0}")]
    UnknownCommand(String),

    #[error("empty line")]
    EmptyLine,

    #[error("no exit command configured")]
    NoExitConfigured,

    #[error("only printable characters allowed in help text")]
    InvalidHelpText,

    #[error("input: {0}")]
    Input(String),

    #[error("{0}")]
    Handler(HandlerError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
