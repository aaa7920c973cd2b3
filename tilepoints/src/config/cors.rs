//! CORS origin configuration. `allowed_origins` defaults to `None`
//! (permissive), rather than an explicit `["*"]`, so an absent section is
//! distinguishable from an explicit allow-all.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
	/// Allowed origins. Supports `*` (all), `*suffix`, `prefix*`, `/regex/`,
	/// and exact strings. `None` means "allow all origins".
	#[serde(default)]
	pub allowed_origins: Option<Vec<String>>,

	/// Preflight cache duration, in seconds. Defaults to 3600.
	#[serde(default)]
	pub max_age_seconds: Option<u64>,
}
