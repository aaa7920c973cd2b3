//! Backing-store connection configuration.
//!
//! # Example YAML
//! ```yaml
//! backing_store:
//!   hosts:
//!     - http://localhost:9200
//!   timeout_secs: 60
//! ```
//!
//! All fields are optional; a missing `backing_store` section yields a
//! client pointed at `http://localhost:9200`.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BackingStoreConfig {
	/// Backing-store hosts, tried in order. Defaults to `["http://localhost:9200"]`.
	#[serde(default = "default_hosts")]
	pub hosts: Vec<String>,

	/// Probe all hosts once at startup and log which are reachable.
	#[serde(default = "default_true")]
	pub sniff_on_start: bool,

	/// Re-probe hosts after a request fails to reach any of them.
	#[serde(default = "default_true")]
	pub sniff_on_connection_fail: bool,

	/// How long a startup sniff is allowed to take across all hosts, in seconds.
	#[serde(default = "default_sniffer_timeout_secs")]
	pub sniffer_timeout_secs: u64,

	/// Per-host timeout for a single sniff probe, in seconds.
	#[serde(default = "default_sniff_timeout_secs")]
	pub sniff_timeout_secs: u64,

	/// Request gzip-compressed responses from the backing store.
	#[serde(default)]
	pub http_compress: bool,

	/// Per-request deadline against the backing store, in seconds. Also used
	/// as the outer per-request timeout for the whole HTTP server.
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
}

fn default_hosts() -> Vec<String> {
	vec!["http://localhost:9200".to_string()]
}

fn default_true() -> bool {
	true
}

fn default_sniffer_timeout_secs() -> u64 {
	60
}

fn default_sniff_timeout_secs() -> u64 {
	10
}

fn default_timeout_secs() -> u64 {
	60
}

impl Default for BackingStoreConfig {
	fn default() -> Self {
		BackingStoreConfig {
			hosts: default_hosts(),
			sniff_on_start: true,
			sniff_on_connection_fail: true,
			sniffer_timeout_secs: default_sniffer_timeout_secs(),
			sniff_timeout_secs: default_sniff_timeout_secs(),
			http_compress: false,
			timeout_secs: default_timeout_secs(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn defaults_point_at_localhost() {
		assert_eq!(BackingStoreConfig::default().hosts, vec!["http://localhost:9200"]);
	}
}
