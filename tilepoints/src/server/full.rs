//! `GET /{z}/full.png` — composites every tile at a zoom level into one
//! image. The per-tile backing-store queries (and, when
//! `with_background=true`, the OSM raster fetches) run concurrently on the
//! async runtime, but the actual rendering — `n*n` renderer invocations
//! plus the final encode — runs inside `spawn_blocking`: a single one of
//! these requests is CPU-heavy enough to risk starving every other
//! in-flight request if it ran directly on a worker thread.

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::future::join_all;
use std::sync::Arc;
use tilepoints_core::Tile;
use tilepoints_geometry::Bucket;
use tilepoints_image::{Canvas, ImageCaches, Style};

use super::error::ApiError;
use super::params::{RawQuery, parse_indexes_and_search, parse_style};
use super::state::AppState;

/// The composite path always uses the standard 256px tile size;
/// `Tile::with_default_size` always produces exactly that.
const TILE_SIZE: u32 = 256;

/// A full zoom level doubles in tile count per `z`; beyond this the
/// composite (and the memory to hold it) gets impractical for a single
/// HTTP response.
const MAX_FULL_ZOOM: u8 = 6;

const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

pub async fn full_handler(Path(z): Path<u8>, Query(raw): Query<RawQuery>, State(state): State<AppState>) -> Result<Response, ApiError> {
	log::debug!("full-tile composite request z={z}");

	if z > MAX_FULL_ZOOM {
		return Err(ApiError::BadRequest(format!(
			"zoom {z} is too large to composite as a single /full.png (max z={MAX_FULL_ZOOM})"
		)));
	}

	let style = parse_style(&raw)?;
	let (indexes, search) = parse_indexes_and_search(&raw)?;
	let with_background = raw.with_background.unwrap_or(false);

	let n = 1_u32 << z;
	let mut tiles = Vec::with_capacity((n * n) as usize);
	for y in 0..n {
		for x in 0..n {
			tiles.push(Tile::with_default_size(z, x, y));
		}
	}

	let bucket_results = join_all(tiles.iter().map(|tile| state.query_client.query(tile, &indexes, search.as_ref()))).await;
	let mut buckets_per_tile = Vec::with_capacity(bucket_results.len());
	for result in bucket_results {
		buckets_per_tile.push(result.map_err(ApiError::from_anyhow)?);
	}

	let backgrounds = if with_background {
		let results = join_all(tiles.iter().map(|tile| fetch_osm_tile(&state.background_client, tile))).await;
		let mut backgrounds = Vec::with_capacity(results.len());
		for result in results {
			backgrounds.push(result?);
		}
		Some(backgrounds)
	} else {
		None
	};

	let caches = Arc::clone(&state.caches);
	let bytes = tokio::task::spawn_blocking(move || render_composite(&tiles, &buckets_per_tile, backgrounds, &style, &caches, n))
		.await
		.map_err(|err| ApiError::Internal(anyhow::anyhow!("composite rendering task panicked: {err}")))?
		.map_err(ApiError::from_anyhow)?;

	Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

fn render_composite(
	tiles: &[Tile],
	buckets_per_tile: &[Vec<Bucket>],
	backgrounds: Option<Vec<Canvas>>,
	style: &Style,
	caches: &ImageCaches,
	n: u32,
) -> anyhow::Result<Vec<u8>> {
	let mut composite = Canvas::new_transparent(n * TILE_SIZE, n * TILE_SIZE);

	for (i, tile) in tiles.iter().enumerate() {
		assert_eq!(tile.tile_size, TILE_SIZE, "full.png compositing assumes a 256px tile size");
		let ox = i64::from(tile.x * TILE_SIZE);
		let oy = i64::from(tile.y * TILE_SIZE);

		if let Some(backgrounds) = &backgrounds {
			composite.blend_from(&backgrounds[i], ox, oy);
		}

		let rendered = style.render(tile, &buckets_per_tile[i], caches)?;
		composite.blend_from(&rendered, ox, oy);
	}

	tilepoints_image::png::encode(&composite.into_rgba_image(), None)
}

/// Fetch and decode one OSM raster tile to underlay beneath the rendered
/// points. Subdomain is picked round-robin across the three mirrors the
/// tile usage policy names.
async fn fetch_osm_tile(client: &reqwest::Client, tile: &Tile) -> Result<Canvas, ApiError> {
	let subdomain = OSM_SUBDOMAINS[(tile.x as usize + tile.y as usize) % OSM_SUBDOMAINS.len()];
	let url = format!("https://{subdomain}.tile.openstreetmap.org/{}/{}/{}.png", tile.z, tile.x, tile.y);

	let response = client
		.get(&url)
		.send()
		.await
		.map_err(|err| ApiError::Upstream(StatusCode::BAD_GATEWAY, format!("background tile fetch failed: {err}")))?;

	if !response.status().is_success() {
		return Err(ApiError::Upstream(
			StatusCode::BAD_GATEWAY,
			format!("background tile server responded with {}", response.status()),
		));
	}

	let bytes = response
		.bytes()
		.await
		.map_err(|err| ApiError::Upstream(StatusCode::BAD_GATEWAY, format!("background tile body read failed: {err}")))?;

	let image = image::load_from_memory(&bytes)
		.map_err(|err| ApiError::Upstream(StatusCode::BAD_GATEWAY, format!("background tile decode failed: {err}")))?;

	Ok(Canvas::from_rgba_image(&image.to_rgba8()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn composites_a_single_tile_at_z0() {
		let tile = Tile::with_default_size(0, 0, 0);
		let caches = ImageCaches::new();
		let style = Style::Plot(tilepoints_image::PlotParams::default());
		let bytes = render_composite(&[tile], &[Vec::new()], None, &style, &caches, 1).unwrap();
		assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
	}
}
