//! Command-line interface module.

mod args;
pub mod init;
pub mod resolve;
pub mod validate;

pub use args::{Cli, Commands, ResolveArgs, ResolveFormat};
