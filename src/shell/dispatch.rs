//! The dispatch loop: resolve each line to a command and run it until the
//! exit command runs or the token fires.

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use tokio::sync::mpsc;

use super::input::{Handoff, Input};
use crate::cancel::CancelToken;
use crate::commands::{Command, Registry};
use crate::error::ShellError;
use crate::parser::parse_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Session state for one run of the loop.
pub struct Dispatcher<'a, W: Write> {
    registry: &'a Registry,
    token: CancelToken,
    out: W,
    prompt: String,
    color: bool,
}

impl<'a, W: Write> Dispatcher<'a, W> {
    pub fn new(registry: &'a Registry, token: CancelToken, out: W) -> Self {
        Self {
            registry,
            token,
            out,
            prompt: "< ".to_string(),
            color: false,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Parse, resolve and run one line.
    ///
    /// Parse, lookup and handler failures are reported and leave the loop
    /// running. Running the exit command ends it, even if it failed.
    pub fn dispatch(&mut self, line: &str) -> io::Result<LoopState> {
        let parsed = match parse_line(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.report(&e)?;
                return Ok(LoopState::Running);
            }
        };
        let cmd = match self.registry.lookup(&parsed.keyword) {
            Ok(cmd) => cmd,
            Err(e) => {
                self.report(&e)?;
                return Ok(LoopState::Running);
            }
        };
        log::debug!("dispatching {:?} with {} arg(s)", cmd.key(), parsed.args.len());
        if let Err(e) = cmd.invoke(&self.token, &parsed.args) {
            self.report(&ShellError::Handler(e))?;
        }
        if self.is_exit(&cmd) {
            log::info!("exit command {:?} ran", cmd.key());
            return Ok(LoopState::Terminated);
        }
        Ok(LoopState::Running)
    }

    /// Cancellation path: run the exit command once with no arguments, then stop.
    pub fn shutdown(&mut self) -> io::Result<LoopState> {
        match self.registry.exit_command() {
            Some(cmd) => {
                log::debug!("invoking exit command {:?}", cmd.key());
                if let Err(e) = cmd.invoke(&self.token, &[]) {
                    self.report(&ShellError::Handler(e))?;
                }
            }
            None => self.report(&ShellError::NoExitConfigured)?,
        }
        Ok(LoopState::Terminated)
    }

    /// Drive the loop from `rx` until it terminates.
    ///
    /// Each handoff is accepted as soon as it is received, which lets the
    /// producer read the next line. A closed channel means the input is
    /// exhausted and is handled like cancellation.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Handoff>) -> io::Result<LoopState> {
        let token = self.token.clone();
        loop {
            self.write_prompt()?;
            tokio::select! {
                input = rx.recv() => match input.map(Handoff::accept) {
                    Some(Input::Line(line)) => {
                        self.write_plain("> ")?;
                        if self.dispatch(&line)? == LoopState::Terminated {
                            return Ok(LoopState::Terminated);
                        }
                    }
                    Some(Input::Failed(msg)) => {
                        self.write_plain("> ")?;
                        self.report(&ShellError::Input(msg))?;
                    }
                    None => {
                        log::info!("input closed, shutting down");
                        self.write_plain("\n> ")?;
                        return self.shutdown();
                    }
                },
                _ = token.cancelled() => {
                    log::info!("cancelled, shutting down");
                    self.write_plain("\n> ")?;
                    return self.shutdown();
                }
            }
        }
    }

    fn is_exit(&self, cmd: &Arc<Command>) -> bool {
        self.registry
            .exit_command()
            .is_some_and(|exit| Arc::ptr_eq(&exit, cmd))
    }

    fn report(&mut self, err: &ShellError) -> io::Result<()> {
        log::debug!("reporting error: {err}");
        let line = format!("Error: {err}\n");
        if self.color {
            queue!(
                self.out,
                SetForegroundColor(Color::Red),
                Print(line),
                ResetColor
            )?;
        } else {
            self.out.write_all(line.as_bytes())?;
        }
        self.out.flush()
    }

    fn write_prompt(&mut self) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetForegroundColor(Color::DarkMagenta),
                Print(&self.prompt),
                ResetColor
            )?;
            self.out.flush()
        } else {
            let prompt = self.prompt.clone();
            self.write_plain(&prompt)
        }
    }

    fn write_plain(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    /// Consume the dispatcher, returning its writer.
    pub fn into_writer(self) -> W {
        self.out
    }
}
