//! The error kinds surfaced at the core boundary. Not `thiserror` — a plain
//! enum with a hand-written `Display`, carried inside `anyhow::Error`
//! everywhere else in the workspace.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
	InvalidRequestType(String),
	InvalidStyle(String),
	InvalidColour(String),
	MissingIndex,
	GridNotPowerOfTwo(u32),
	UpstreamUnavailable(String),
	UpstreamMalformed(String),
	UpstreamTimeout,
}

impl fmt::Display for CoreError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		use CoreError::*;
		match self {
			InvalidRequestType(t) => write!(f, "'{t}' is not a valid request type, must be png or grid.json"),
			InvalidStyle(s) => write!(f, "'{s}' is not a valid style, must be plot, gridded or heatmap"),
			InvalidColour(c) => write!(f, "'{c}' is not a valid colour"),
			MissingIndex => write!(f, "an index must be specified"),
			GridNotPowerOfTwo(size) => write!(f, "grid size ({size}) must be a power of two"),
			UpstreamUnavailable(msg) => write!(f, "backing store unavailable: {msg}"),
			UpstreamMalformed(msg) => write!(f, "backing store response malformed: {msg}"),
			UpstreamTimeout => write!(f, "backing store request timed out"),
		}
	}
}

impl std::error::Error for CoreError {}

impl CoreError {
	/// `true` for errors that must be detected before any expensive work —
	/// these map to HTTP 400 at the server boundary.
	#[must_use]
	pub fn is_validation_error(&self) -> bool {
		!matches!(
			self,
			CoreError::UpstreamUnavailable(_) | CoreError::UpstreamMalformed(_) | CoreError::UpstreamTimeout
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn validation_errors_are_distinguished_from_upstream_errors() {
		assert!(CoreError::MissingIndex.is_validation_error());
		assert!(CoreError::InvalidStyle("foo".into()).is_validation_error());
		assert!(!CoreError::UpstreamTimeout.is_validation_error());
		assert!(!CoreError::UpstreamUnavailable("refused".into()).is_validation_error());
	}

	#[test]
	fn display_messages_are_human_readable() {
		assert_eq!(
			CoreError::InvalidRequestType("svg".into()).to_string(),
			"'svg' is not a valid request type, must be png or grid.json"
		);
		assert_eq!(CoreError::GridNotPowerOfTwo(6).to_string(), "grid size (6) must be a power of two");
	}
}
