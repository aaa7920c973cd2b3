//! HTTP server network configuration: bind address/port and CORS policy.

use super::CorsConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// Bind IP address. Defaults to "0.0.0.0".
	#[serde(default)]
	pub ip: Option<String>,

	/// Bind port. Defaults to 5000.
	#[serde(default)]
	pub port: Option<u16>,

	#[serde(default)]
	pub cors: CorsConfig,
}

impl ServerConfig {
	pub fn override_optional_ip(&mut self, ip: &Option<String>) {
		if ip.is_some() {
			self.ip.clone_from(ip);
		}
	}

	pub fn override_optional_port(&mut self, port: &Option<u16>) {
		if port.is_some() {
			self.port = *port;
		}
	}
}
