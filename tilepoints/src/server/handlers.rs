//! Request handlers: the tile endpoint (PNG or UTFGrid), the liveness
//! probe, and the whole-zoom-level composite.

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::time::Instant;
use tilepoints_core::{CoreError, Tile};

use super::error::ApiError;
use super::params::{RawQuery, parse_indexes_and_search, parse_style, utfgrid_defaults};
use super::state::AppState;

enum RequestType {
	Png,
	Grid,
}

/// Splits a path segment like `"20.png"` or `"20.grid.json"` into the `y`
/// digits and the request type, splitting on the *first* `.` so
/// `"grid.json"` (which itself contains a dot) isn't cut in half.
fn split_request_type(segment: &str) -> Result<(&str, RequestType), ApiError> {
	let (y_str, ext) = segment.split_once('.').ok_or_else(|| CoreError::InvalidRequestType(segment.to_string()))?;
	let request_type = match ext {
		"png" => RequestType::Png,
		"grid.json" => RequestType::Grid,
		other => return Err(CoreError::InvalidRequestType(other.to_string()).into()),
	};
	Ok((y_str, request_type))
}

fn parse_tile(z: u8, x: u32, y_str: &str) -> Result<Tile, ApiError> {
	let y: u32 = y_str
		.parse()
		.map_err(|_| ApiError::BadRequest(format!("'{y_str}' is not a valid tile y coordinate")))?;
	let size = 1_u32 << z.min(31);
	if x >= size || y >= size {
		return Err(ApiError::BadRequest(format!("tile coordinate ({x},{y}) out of range for z={z}")));
	}
	Ok(Tile::with_default_size(z, x, y))
}

fn png_response(bytes: Vec<u8>) -> Response {
	([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

fn json_response(text: String) -> Response {
	([(header::CONTENT_TYPE, "application/json")], text).into_response()
}

/// `GET /{z}/{x}/{y}.{type}` — a single tile, rendered as PNG or encoded as
/// a UTFGrid 1.3 interactivity document.
pub async fn tile_handler(
	Path((z, x, yext)): Path<(u8, u32, String)>,
	Query(raw): Query<RawQuery>,
	State(state): State<AppState>,
) -> Result<Response, ApiError> {
	log::debug!("tile request z={z} x={x} {yext}");

	let (y_str, request_type) = split_request_type(&yext)?;
	let tile = parse_tile(z, x, y_str)?;
	let style = parse_style(&raw)?;
	let (indexes, search) = parse_indexes_and_search(&raw)?;

	let started = Instant::now();
	let buckets = state
		.query_client
		.query(&tile, &indexes, search.as_ref())
		.await
		.map_err(ApiError::from_anyhow)?;
	log::info!("queried {} buckets for z={z} x={x} y={} in {:?}", buckets.len(), y_str, started.elapsed());

	match request_type {
		RequestType::Png => {
			let canvas = style.render(&tile, &buckets, &state.caches).map_err(ApiError::from_anyhow)?;
			let bytes = tilepoints_image::png::encode(&canvas.into_rgba_image(), None).map_err(ApiError::from_anyhow)?;
			Ok(png_response(bytes))
		}
		RequestType::Grid => {
			if matches!(style, tilepoints_image::Style::Heatmap(_)) {
				// Heatmap has no interactivity layer; per spec it returns a bare
				// `{}` rather than a well-formed-but-empty UTFGrid document.
				return Ok(json_response("{}".to_string()));
			}
			let (grid_resolution, point_width) = utfgrid_defaults(&style, &raw);
			let grid = style
				.render_utfgrid(&tile, &buckets, grid_resolution, point_width)
				.map_err(ApiError::from_anyhow)?;
			Ok(json_response(grid.to_json().stringify()))
		}
	}
}

/// `GET /status` — a liveness probe that never touches the backing store.
pub async fn status_handler() -> impl IntoResponse {
	(StatusCode::OK, "ok")
}

pub use super::full::full_handler;
