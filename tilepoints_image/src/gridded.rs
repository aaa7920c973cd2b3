//! The Gridded renderer: buckets are grouped into a coarse grid over the
//! tile and each non-empty cell is painted as a single disc, coloured along
//! an exponential cold→hot ramp keyed on the cell's summed count.

use crate::cache::ImageCaches;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::resize::box_downsample;
use anyhow::Result;
use tilepoints_core::Tile;
use tilepoints_geometry::{Bucket, group_into_cells};

#[derive(Debug, Clone, Copy)]
pub struct GriddedParams {
	pub grid_resolution: u32,
	pub cold_colour: Color,
	pub hot_colour: Color,
	pub range_size: usize,
	pub resize_factor: u32,
}

impl Default for GriddedParams {
	fn default() -> Self {
		GriddedParams {
			grid_resolution: 8,
			cold_colour: Color::rgb(0xf4, 0xf1, 0x1a),
			hot_colour: Color::rgb(0xf0, 0x23, 0x23),
			range_size: 12,
			resize_factor: 4,
		}
	}
}

/// Assign a colour to `count` along an exponential cold→hot ramp.
///
/// The colour range itself is linear (`range_size + 1` evenly spaced
/// colours), but thresholds for picking an index grow exponentially
/// (`floor(e^i)` for `i` in `0..range_size`) so a handful of colours can
/// usefully span counts from 1 to an unbounded upper end. Returns `None`
/// for a count of zero — there's nothing to paint.
#[must_use]
pub fn assign_colour(count: u64, cold_colour: Color, hot_colour: Color, range_size: usize) -> Option<Color> {
	if count == 0 {
		return None;
	}
	let colours = cold_colour.range_to(hot_colour, range_size + 1);
	let thresholds: Vec<u64> = (0..range_size).map(|i| (i as f64).exp().floor() as u64).collect();
	let index = thresholds.partition_point(|&t| t < count);
	Some(colours[index])
}

/// Render `buckets` onto `tile` as one coloured disc per non-empty grid
/// cell, returning an RGBA canvas of side `tile.tile_size`.
///
/// # Errors
/// Propagates any error from the final downsampling step.
pub fn render(tile: &Tile, buckets: &[Bucket], params: &GriddedParams, caches: &ImageCaches) -> Result<Canvas> {
	let rf = params.resize_factor.max(1);
	let oversampled_side = tile.tile_size * rf;
	let mut oversampled = Canvas::new_transparent(oversampled_side, oversampled_side);
	let point_radius = params.grid_resolution / 2;

	for cell in group_into_cells(tile, buckets, params.grid_resolution) {
		let Some(colour) = assign_colour(cell.count, params.cold_colour, params.hot_colour, params.range_size) else {
			continue;
		};
		let stamp = caches.get_point(point_radius, 0, rf, colour, None);
		let ox = (cell.gx * params.grid_resolution * rf) as i64;
		let oy = (cell.gy * params.grid_resolution * rf) as i64;
		oversampled.blend_from(&stamp, ox, oy);
	}

	if rf == 1 {
		Ok(oversampled)
	} else {
		box_downsample(&oversampled, tile.tile_size, tile.tile_size)
	}
}
