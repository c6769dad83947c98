pub mod cancel;
pub mod commands;
pub mod config;
pub mod dice;
pub mod error;
pub mod ops;
pub mod parser;
pub mod printable;
pub mod shell;

pub use cancel::CancelToken;
pub use error::{HandlerError, Result, ShellError};
pub use shell::{LoopState, Shell};

#[cfg(test)]
pub mod test_helpers;
