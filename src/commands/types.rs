//! Command system types.

use std::fmt;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::error::HandlerError;

/// Behaviour bound to a registered command.
///
/// Handlers run synchronously on the dispatch loop. Long-running handlers
/// should poll `token.is_cancelled()` and return early once it fires.
pub trait Handler: Send + Sync {
    fn invoke(&self, token: &CancelToken, args: &[String]) -> Result<(), HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&CancelToken, &[String]) -> Result<(), HandlerError> + Send + Sync,
{
    fn invoke(&self, token: &CancelToken, args: &[String]) -> Result<(), HandlerError> {
        self(token, args)
    }
}

/// Pin a closure to the handler signature so its argument and error types
/// are inferred at the call site.
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(&CancelToken, &[String]) -> Result<(), HandlerError> + Send + Sync,
{
    f
}

/// A registered command. Immutable once it is in the registry.
pub struct Command {
    key: String,
    help: String,
    handler: Arc<dyn Handler>,
}

impl Command {
    pub(crate) fn new(key: String, help: String, handler: Arc<dyn Handler>) -> Self {
        Self { key, help, handler }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn invoke(&self, token: &CancelToken, args: &[String]) -> Result<(), HandlerError> {
        self.handler.invoke(token, args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("key", &self.key)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

/// A command record submitted for registration. The handler may be missing.
#[derive(Default)]
pub struct CommandSpec {
    pub key: String,
    pub help: String,
    pub handler: Option<Arc<dyn Handler>>,
}

impl CommandSpec {
    pub fn new(key: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            help: help.into(),
            handler: None,
        }
    }

    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }
}

/// Descriptive metadata handed to the help page. Not interpreted by dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub banner: Option<String>,
}
