//! The Plot renderer: one flat-coloured point stamp per bucket, anti-aliased
//! by oversampling then downsampling — the "draw big, shrink down" technique
//! `box_downsample` wraps around `fast_image_resize`.

use crate::cache::ImageCaches;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::resize::box_downsample;
use anyhow::Result;
use tilepoints_core::Tile;
use tilepoints_geometry::Bucket;

#[derive(Debug, Clone, Copy)]
pub struct PlotParams {
	pub point_radius: u32,
	pub border_width: u32,
	pub resize_factor: u32,
	pub point_colour: Color,
	pub border_colour: Color,
}

impl Default for PlotParams {
	fn default() -> Self {
		PlotParams {
			point_radius: 4,
			border_width: 1,
			resize_factor: 4,
			point_colour: Color::rgb(0xee, 0x00, 0x00),
			border_colour: Color::rgb(0xff, 0xff, 0xff),
		}
	}
}

/// Render `buckets` onto `tile` as flat-coloured points, returning an RGBA
/// canvas of side `tile.tile_size`.
///
/// # Errors
/// Propagates any error from the final downsampling step.
pub fn render(tile: &Tile, buckets: &[Bucket], params: &PlotParams, caches: &ImageCaches) -> Result<Canvas> {
	let rf = params.resize_factor.max(1);
	let oversampled_side = tile.tile_size * rf;
	let mut oversampled = Canvas::new_transparent(oversampled_side, oversampled_side);

	let stamp = caches.get_point(
		params.point_radius,
		params.border_width,
		rf,
		params.point_colour,
		Some(params.border_colour).filter(|_| params.border_width > 0),
	);

	for bucket in buckets {
		let (x, y) = tile.pixel_position(bucket.centre_lat, bucket.centre_lon, rf);
		let radius_rf = f64::from(params.point_radius * rf);
		let ox = (x - radius_rf).round() as i64;
		let oy = (y - radius_rf).round() as i64;
		oversampled.underlay_from(&stamp, ox, oy);
	}

	if rf == 1 {
		Ok(oversampled)
	} else {
		box_downsample(&oversampled, tile.tile_size, tile.tile_size)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tilepoints_core::json::JsonValue;

	fn bucket_at_tile_centre(tile: &Tile) -> Bucket {
		let (lat, lon) = tile.middle();
		// "u0mwd" decodes far from the test tile; we only need valid
		// geometry, so override centre_lat/centre_lon directly below
		// instead of relying on the geohash key's own position.
		let mut bucket = Bucket::new("u0mwd".to_string(), 7, JsonValue::Null).unwrap();
		bucket.centre_lat = lat;
		bucket.centre_lon = lon;
		bucket
	}

	#[test]
	fn a_point_at_tile_centre_paints_opaque_pixels_near_the_canvas_centre() {
		let tile = Tile::with_default_size(6, 20, 20);
		let caches = ImageCaches::new();
		let params = PlotParams::default();
		let canvas = render(&tile, &[bucket_at_tile_centre(&tile)], &params, &caches).unwrap();
		assert_eq!(canvas.width, 256);
		let centre = canvas.get(128, 128);
		assert!(centre[3] > 0, "expected an opaque pixel at the tile centre, got alpha {}", centre[3]);
	}

	#[test]
	fn resize_factor_of_one_skips_downsampling_and_keeps_tile_size() {
		let tile = Tile::with_default_size(6, 20, 20);
		let caches = ImageCaches::new();
		let params = PlotParams {
			resize_factor: 1,
			..PlotParams::default()
		};
		let canvas = render(&tile, &[bucket_at_tile_centre(&tile)], &params, &caches).unwrap();
		assert_eq!(canvas.width, 256);
		assert_eq!(canvas.height, 256);
	}

	#[test]
	fn an_earlier_bucket_stays_on_top_of_a_later_overlapping_one() {
		let tile = Tile::with_default_size(6, 20, 20);
		let caches = ImageCaches::new();
		let params = PlotParams {
			border_width: 0,
			point_colour: Color::rgb(255, 0, 0),
			resize_factor: 1,
			..PlotParams::default()
		};
		let mut first = bucket_at_tile_centre(&tile);
		first.total = 100;
		let mut second = bucket_at_tile_centre(&tile);
		second.total = 1;
		let canvas = render(&tile, &[first, second], &params, &caches).unwrap();
		// Both buckets paint the same red colour here; the point of this test is
		// that rendering order doesn't panic or drop the first paste — colour
		// equality is the only externally observable signal available when
		// both stamps are identical.
		assert_eq!(canvas.get(128, 128), [255, 0, 0, 255]);
	}
}
