//! Command registry: unique keys, lookup, and the exit designation.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::types::{Command, CommandSpec, Handler};
use crate::error::{Result, ShellError};
use crate::printable::is_printable;

/// Named commands plus the key of the command that ends the loop.
///
/// Built during setup and only read while the dispatch loop runs.
#[derive(Debug, Default)]
pub struct Registry {
    commands: BTreeMap<String, Arc<Command>>,
    exit_key: Option<String>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command whose handler is present.
    pub fn register(
        &mut self,
        key: &str,
        help: &str,
        handler: impl Handler + 'static,
    ) -> Result<()> {
        self.add(CommandSpec::new(key, help).handler(handler))
    }

    /// Register a command record.
    pub fn add(&mut self, spec: CommandSpec) -> Result<()> {
        let Some(handler) = spec.handler else {
            return Err(ShellError::NilHandler(spec.key));
        };
        if !is_valid_key(&spec.key) {
            return Err(ShellError::InvalidKey(spec.key));
        }
        if self.commands.contains_key(&spec.key) {
            return Err(ShellError::DuplicateKey(spec.key));
        }
        let cmd = Command::new(spec.key.clone(), spec.help, handler);
        self.commands.insert(spec.key, Arc::new(cmd));
        Ok(())
    }

    /// Resolve a key to the stored command.
    ///
    /// The returned `Arc` points at the registry's own entry, so two lookups
    /// of the same key compare equal with `Arc::ptr_eq`.
    pub fn lookup(&self, key: &str) -> Result<Arc<Command>> {
        self.commands
            .get(key)
            .cloned()
            .ok_or_else(|| ShellError::UnknownCommand(key.to_string()))
    }

    /// Designate an existing command as the exit command, replacing any earlier choice.
    pub fn set_exit(&mut self, key: &str) -> Result<()> {
        if !self.commands.contains_key(key) {
            return Err(ShellError::UnknownCommand(key.to_string()));
        }
        if let Some(previous) = self.exit_key.replace(key.to_string()) {
            if previous != key {
                log::debug!("exit command changed from {previous:?} to {key:?}");
            }
        }
        Ok(())
    }

    pub fn exit_key(&self) -> Option<&str> {
        self.exit_key.as_deref()
    }

    /// The command designated as exit, if any.
    pub fn exit_command(&self) -> Option<Arc<Command>> {
        self.exit_key
            .as_deref()
            .and_then(|key| self.commands.get(key))
            .cloned()
    }

    /// `(key, help)` pairs sorted by key.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.commands
            .values()
            .map(|cmd| (cmd.key(), cmd.help()))
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.commands.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// A key has to survive the line parser intact to be reachable.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && is_printable(key) && !key.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{noop, Recorder};

    #[test]
    fn distinct_keys_register() {
        let mut registry = Registry::new();
        registry.register("roll", "Roll the die", noop()).unwrap();
        registry.register("stop", "Stop", noop()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("roll"));
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut registry = Registry::new();
        registry.register("roll", "first", noop()).unwrap();
        let err = registry.register("roll", "second", noop()).unwrap_err();
        assert!(matches!(err, ShellError::DuplicateKey(k) if k == "roll"));
        assert_eq!(registry.lookup("roll").unwrap().help(), "first");
    }

    #[test]
    fn invalid_keys_rejected() {
        let mut registry = Registry::new();
        for key in ["", "foo\tbar", "bell\u{7}", "two words"] {
            let err = registry.register(key, "", noop()).unwrap_err();
            assert!(matches!(err, ShellError::InvalidKey(_)), "key {key:?}");
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_handler_rejected() {
        let mut registry = Registry::new();
        let err = registry.add(CommandSpec::new("roll", "Roll")).unwrap_err();
        assert!(matches!(err, ShellError::NilHandler(k) if k == "roll"));
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_unknown() {
        let registry = Registry::new();
        assert!(matches!(
            registry.lookup("xyz"),
            Err(ShellError::UnknownCommand(k)) if k == "xyz"
        ));
    }

    #[test]
    fn lookup_returns_shared_entry() {
        let mut registry = Registry::new();
        registry.register("roll", "", noop()).unwrap();
        let a = registry.lookup("roll").unwrap();
        let b = registry.lookup("roll").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn lookup_invokes_registered_handler() {
        let recorder = Recorder::new();
        let mut registry = Registry::new();
        registry.register("roll", "", recorder.handler()).unwrap();
        let cmd = registry.lookup("roll").unwrap();
        cmd.invoke(&crate::cancel::CancelToken::new(), &["3".to_string()])
            .unwrap();
        assert_eq!(recorder.calls(), vec![vec!["3".to_string()]]);
    }

    #[test]
    fn set_exit_requires_existing_key() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.set_exit("nope"),
            Err(ShellError::UnknownCommand(_))
        ));
        assert!(registry.exit_command().is_none());
    }

    #[test]
    fn set_exit_replaces_previous() {
        let mut registry = Registry::new();
        registry.register("quit", "", noop()).unwrap();
        registry.register("stop", "", noop()).unwrap();
        registry.set_exit("quit").unwrap();
        registry.set_exit("stop").unwrap();
        assert_eq!(registry.exit_key(), Some("stop"));
        let exit = registry.exit_command().unwrap();
        assert!(Arc::ptr_eq(&exit, &registry.lookup("stop").unwrap()));
    }

    #[test]
    fn list_is_sorted_and_stable() {
        let mut registry = Registry::new();
        assert!(registry.list().is_empty());
        registry.register("stop", "Stop", noop()).unwrap();
        registry.register("help", "Help", noop()).unwrap();
        registry.register("roll", "Roll", noop()).unwrap();
        let first = registry.list();
        assert_eq!(
            first,
            vec![("help", "Help"), ("roll", "Roll"), ("stop", "Stop")]
        );
        assert_eq!(first, registry.list());
    }
}
