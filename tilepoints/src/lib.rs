//! The `tilepoints` HTTP server: YAML configuration, a `clap` CLI, and the
//! axum router that answers tile and UTFGrid requests.

pub mod cli;
pub mod config;
pub mod server;

pub use cli::{Cli, Commands, ServeArgs};
pub use config::Config;
