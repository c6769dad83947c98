//! The shell session: registry, metadata and the run entry point.
//!
//! Setup happens through `&mut Shell`; `run` only needs `&Shell`, so the
//! registry cannot change while the loop is live.

mod dispatch;
mod input;

pub use dispatch::{Dispatcher, LoopState};
pub use input::{spawn_producer, Handoff, Input};

use std::io::{BufRead, Write};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;

use crate::cancel::CancelToken;
use crate::commands::{from_fn, render_help, AppInfo, CommandSpec, Handler, Registry};
use crate::error::{Result, ShellError};
use crate::printable::is_printable;

/// A single-operator command shell.
pub struct Shell {
    registry: Registry,
    info: AppInfo,
    prompt: String,
    color: bool,
    help_page: Arc<RwLock<String>>,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            info: AppInfo::default(),
            prompt: "< ".to_string(),
            color: false,
            help_page: Arc::new(RwLock::new(String::new())),
        }
    }

    pub fn register(
        &mut self,
        key: &str,
        help: &str,
        handler: impl Handler + 'static,
    ) -> Result<()> {
        self.registry.register(key, help, handler)?;
        self.publish_help();
        Ok(())
    }

    pub fn add(&mut self, spec: CommandSpec) -> Result<()> {
        self.registry.add(spec)?;
        self.publish_help();
        Ok(())
    }

    pub fn set_exit(&mut self, key: &str) -> Result<()> {
        self.registry.set_exit(key)
    }

    /// Register `key` as a command printing the help page.
    ///
    /// The page is kept in step with every later setup call, so it also
    /// lists commands registered after this one.
    pub fn help_command(&mut self, key: &str) -> Result<()> {
        let page = Arc::clone(&self.help_page);
        self.register(
            key,
            "Print usage statement",
            from_fn(move |_, _| {
                let page = page.read().unwrap_or_else(PoisonError::into_inner);
                println!("{page}");
                Ok(())
            }),
        )
    }

    pub fn set_name(&mut self, name: &str) {
        self.info.name = Some(name.to_string());
        self.publish_help();
    }

    pub fn set_version(&mut self, version: &str) {
        self.info.version = Some(version.to_string());
        self.publish_help();
    }

    /// Set the free-text banner shown above the command list.
    pub fn set_help_text(&mut self, text: &str) -> Result<()> {
        if !is_printable(text) {
            return Err(ShellError::InvalidHelpText);
        }
        self.info.banner = Some(text.to_string());
        self.publish_help();
        Ok(())
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn info(&self) -> &AppInfo {
        &self.info
    }

    /// The help page for the current registry.
    pub fn help_page(&self) -> String {
        render_help(&self.info, &self.registry.list())
    }

    /// Run the loop until the exit command runs or `token` fires.
    ///
    /// Lines are read from `input` on a dedicated thread. The loop works on
    /// a child of `token`, cancelled on return so the reader stops after its
    /// current line.
    pub async fn run<R, W>(
        &self,
        input: R,
        output: W,
        token: &CancelToken,
    ) -> Result<LoopState>
    where
        R: BufRead + Send + 'static,
        W: Write,
    {
        let session = token.child();
        let (tx, rx) = mpsc::channel(1);
        spawn_producer(input, tx, session.clone());

        let dispatcher = Dispatcher::new(&self.registry, session.clone(), output)
            .with_prompt(self.prompt.clone())
            .with_color(self.color);
        let state = dispatcher.run(rx).await;
        session.cancel();
        Ok(state?)
    }

    fn publish_help(&self) {
        let page = self.help_page();
        *self.help_page.write().unwrap_or_else(PoisonError::into_inner) = page;
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
