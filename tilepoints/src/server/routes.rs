//! Router composition and the global middleware stack.
//!
//! `LoadShed → ConcurrencyLimit → Buffer → Timeout → CatchPanic →
//! HandleError`, layered innermost to outermost, so a slow or wedged
//! backing store degrades to `503` instead of queueing requests forever,
//! and a renderer panic becomes a `500` instead of taking down a worker
//! thread.

use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{BoxError, Router};
use std::time::Duration;
use tower::{ServiceBuilder, buffer::BufferLayer, limit::ConcurrencyLimitLayer, load_shed::LoadShedLayer, timeout::TimeoutLayer};
use tower_http::catch_panic::CatchPanicLayer;

use super::cors::build_cors_layer;
use super::handlers::{full_handler, status_handler, tile_handler};
use super::state::AppState;
use crate::config::CorsConfig;

/// Bounded in-flight work and a bounded queue in front of it: generous
/// enough not to bite ordinary traffic, present so a wedged backing store
/// can't let requests pile up unbounded.
const GLOBAL_CONCURRENCY: usize = 256;
const GLOBAL_BUFFER: usize = 512;

pub fn build_router(state: AppState, cors: &CorsConfig, request_timeout: Duration) -> anyhow::Result<Router> {
	let router = Router::new()
		.route("/status", get(status_handler))
		.route("/{z}/full.png", get(full_handler))
		.route("/{z}/{x}/{yext}", get(tile_handler))
		.with_state(state);

	let cors_layer = build_cors_layer(cors)?;

	let overload_handler = HandleErrorLayer::new(|_err: BoxError| async move {
		let mut response = (StatusCode::SERVICE_UNAVAILABLE, "backing store overloaded, try later").into_response();
		response.headers_mut().insert("Retry-After", "2".parse().unwrap());
		Ok::<_, std::convert::Infallible>(response)
	});

	let protection = ServiceBuilder::new()
		.layer(overload_handler)
		.layer(CatchPanicLayer::new())
		.layer(TimeoutLayer::new(request_timeout))
		.layer(BufferLayer::new(GLOBAL_BUFFER))
		.layer(ConcurrencyLimitLayer::new(GLOBAL_CONCURRENCY))
		.layer(LoadShedLayer::new());

	Ok(router.layer(cors_layer).layer(protection))
}
