//! Maps errors onto HTTP responses.
//!
//! `CoreError` already classifies itself via `is_validation_error`; this
//! layer just picks the status code and logs at the right level (warn for
//! anything surfaced to the client, error for anything that shouldn't have
//! happened).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tilepoints_core::CoreError;

pub enum ApiError {
	BadRequest(String),
	Upstream(StatusCode, String),
	Internal(anyhow::Error),
}

impl ApiError {
	/// Downcast a propagated `anyhow::Error` back to `CoreError` to pick a
	/// status code; anything else is a bug, not a client mistake.
	pub fn from_anyhow(err: anyhow::Error) -> Self {
		match err.downcast::<CoreError>() {
			Ok(core_err) => ApiError::from(core_err),
			Err(err) => ApiError::Internal(err),
		}
	}
}

impl From<CoreError> for ApiError {
	fn from(err: CoreError) -> Self {
		if err.is_validation_error() {
			return ApiError::BadRequest(err.to_string());
		}
		let status = match err {
			CoreError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
			CoreError::UpstreamUnavailable(_) | CoreError::UpstreamMalformed(_) => StatusCode::BAD_GATEWAY,
			_ => unreachable!("validation errors are handled above"),
		};
		ApiError::Upstream(status, err.to_string())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, message) = match self {
			ApiError::BadRequest(message) => {
				log::warn!("rejecting request: {message}");
				(StatusCode::BAD_REQUEST, message)
			}
			ApiError::Upstream(status, message) => {
				log::warn!("upstream error ({status}): {message}");
				(status, message)
			}
			ApiError::Internal(err) => {
				log::error!("internal error: {err:#}");
				(StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
			}
		};
		(status, message).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn validation_errors_become_bad_request() {
		let api_err = ApiError::from(CoreError::MissingIndex);
		assert!(matches!(api_err, ApiError::BadRequest(_)));
	}

	#[test]
	fn upstream_timeout_becomes_gateway_timeout() {
		let api_err = ApiError::from(CoreError::UpstreamTimeout);
		assert!(matches!(api_err, ApiError::Upstream(StatusCode::GATEWAY_TIMEOUT, _)));
	}

	#[test]
	fn upstream_unavailable_becomes_bad_gateway() {
		let api_err = ApiError::from(CoreError::UpstreamUnavailable("refused".into()));
		assert!(matches!(api_err, ApiError::Upstream(StatusCode::BAD_GATEWAY, _)));
	}

	#[test]
	fn non_core_errors_become_internal() {
		let api_err = ApiError::from_anyhow(anyhow::anyhow!("boom"));
		assert!(matches!(api_err, ApiError::Internal(_)));
	}
}
