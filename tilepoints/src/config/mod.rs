//! YAML configuration for the `tilepoints` server.
//!
//! Loaded from the file named by the `TILEPOINTS_CONFIG` environment
//! variable, or overridden by `serve --config`. Every field is optional;
//! an absent or empty file parses into a config that runs against a
//! backing store at `http://localhost:9200`.
//!
//! # Example YAML
//! ```yaml
//! backing_store:
//!   hosts:
//!     - http://localhost:9200
//!   timeout_secs: 60
//!
//! server:
//!   ip: 0.0.0.0
//!   port: 5000
//!   cors:
//!     allowed_origins:
//!       - https://example.org
//!       - "*.example.net"
//! ```

mod backing_store;
mod cors;
mod server;

pub use backing_store::BackingStoreConfig;
pub use cors::CorsConfig;
pub use server::ServerConfig;

use anyhow::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tilepoints_derive::context;

/// The env var pointing at a YAML config file, consulted when `serve` is
/// invoked without `--config`.
pub const CONFIG_ENV_VAR: &str = "TILEPOINTS_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	#[serde(default)]
	pub backing_store: BackingStoreConfig,

	#[serde(default)]
	pub server: ServerConfig,
}

impl Config {
	/// Parse a YAML config from any `Read` implementor.
	#[context("parsing config from reader (YAML)")]
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	/// Parse a YAML config from a string slice.
	#[context("parsing config from string (YAML)")]
	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parse from a file path.
	#[context("reading config file '{}'", path.display())]
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path)?;
		Config::from_reader(BufReader::new(file))
	}

	/// Resolve a config, preferring an explicit `--config` path, falling
	/// back to `TILEPOINTS_CONFIG`, and finally to an all-defaults config
	/// runnable against `http://localhost:9200`.
	#[context("resolving server configuration")]
	pub fn resolve(explicit_path: Option<&Path>) -> Result<Self> {
		if let Some(path) = explicit_path {
			return Config::from_path(path);
		}
		match std::env::var(CONFIG_ENV_VAR) {
			Ok(path) => Config::from_path(Path::new(&path)),
			Err(_) => Ok(Config::default()),
		}
	}
}
