//! Command system.
//!
//! # Architecture
//!
//! - `types`: handler contract, command records and app metadata
//! - `registry`: keyed command storage and the exit designation
//! - `render`: help page generation

mod registry;
mod render;
mod types;

pub use registry::Registry;
pub use render::render_help;
pub use types::{from_fn, AppInfo, Command, CommandSpec, Handler};
