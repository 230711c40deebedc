//! Command-line interface module.

mod args;
pub mod compose;
pub mod serve;
pub mod versions;

pub use args::{Cli, Commands, PreviewArgs};
