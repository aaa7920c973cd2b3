//! Tile rendering: three PNG styles (Plot, Gridded, Heatmap) sharing a
//! common RGBA canvas and point/kernel image cache, plus the PNG encoder
//! and box-downsampler they're all built on.

pub mod cache;
pub mod canvas;
pub mod color;
pub mod gridded;
pub mod heatmap;
pub mod plot;
pub mod png;
pub mod resize;

pub use cache::ImageCaches;
pub use canvas::Canvas;
pub use color::Color;
pub use gridded::{GriddedParams, assign_colour};
pub use heatmap::{HeatmapParams, bucket_weight};
pub use plot::PlotParams;

use anyhow::Result;
use tilepoints_core::Tile;
use tilepoints_geometry::{Bucket, UtfGrid};

/// The three rendering styles a request can ask for, each with its own
/// parameter set. Dispatches to the matching renderer and, where it makes
/// sense, the matching UTFGrid encoder.
#[derive(Debug, Clone, Copy)]
pub enum Style {
	Plot(PlotParams),
	Gridded(GriddedParams),
	Heatmap(HeatmapParams),
}

impl Style {
	/// Render this style's PNG canvas for `tile`/`buckets`.
	///
	/// # Errors
	/// Propagates any error from the underlying renderer (downsampling
	/// failures for Plot/Gridded; Heatmap never fails).
	pub fn render(&self, tile: &Tile, buckets: &[Bucket], caches: &ImageCaches) -> Result<Canvas> {
		match self {
			Style::Plot(params) => plot::render(tile, buckets, params, caches),
			Style::Gridded(params) => gridded::render(tile, buckets, params, caches),
			Style::Heatmap(params) => Ok(heatmap::render(tile, buckets, params, caches)),
		}
	}

	/// Encode this style's UTFGrid document, if it has one. Heatmap has no
	/// meaningful interactivity layer and always returns an empty document.
	///
	/// # Errors
	/// Returns `CoreError::GridNotPowerOfTwo` (wrapped) if `grid_resolution`
	/// doesn't evenly divide the tile into a power-of-two grid.
	pub fn render_utfgrid(&self, tile: &Tile, buckets: &[Bucket], grid_resolution: u32, point_width: u32) -> Result<UtfGrid> {
		match self {
			Style::Plot(_) => Ok(tilepoints_geometry::encode_plot(tile, buckets, grid_resolution, point_width)?),
			Style::Gridded(_) => Ok(tilepoints_geometry::encode_gridded(tile, buckets, grid_resolution, point_width)?),
			Style::Heatmap(_) => Ok(UtfGrid {
				grid: Vec::new(),
				keys: Vec::new(),
				data: tilepoints_core::json::JsonObject::new(),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tilepoints_core::json::JsonValue;

	fn bucket_at_tile_centre(tile: &Tile) -> Bucket {
		let (lat, lon) = tile.middle();
		let mut bucket = Bucket::new("u0mwd".to_string(), 5, JsonValue::Null).unwrap();
		bucket.centre_lat = lat;
		bucket.centre_lon = lon;
		bucket
	}

	#[test]
	fn every_style_renders_a_tile_sized_canvas() {
		let tile = Tile::with_default_size(6, 20, 20);
		let caches = ImageCaches::new();
		let buckets = [bucket_at_tile_centre(&tile)];
		for style in [
			Style::Plot(PlotParams::default()),
			Style::Gridded(GriddedParams::default()),
			Style::Heatmap(HeatmapParams::default()),
		] {
			let canvas = style.render(&tile, &buckets, &caches).unwrap();
			assert_eq!(canvas.width, 256, "{style:?}");
			assert_eq!(canvas.height, 256, "{style:?}");
		}
	}

	#[test]
	fn heatmap_utfgrid_is_always_empty() {
		let tile = Tile::with_default_size(6, 20, 20);
		let buckets = [bucket_at_tile_centre(&tile)];
		let grid = Style::Heatmap(HeatmapParams::default())
			.render_utfgrid(&tile, &buckets, 32, 3)
			.unwrap();
		assert!(grid.grid.is_empty());
		assert!(grid.keys.is_empty());
	}

	#[test]
	fn plot_and_gridded_utfgrids_register_at_least_one_mark() {
		let tile = Tile::with_default_size(6, 20, 20);
		let buckets = [bucket_at_tile_centre(&tile)];
		for style in [Style::Plot(PlotParams::default()), Style::Gridded(GriddedParams::default())] {
			let grid = style.render_utfgrid(&tile, &buckets, 32, 3).unwrap();
			assert!(grid.keys.len() > 1, "{style:?}");
		}
	}
}
