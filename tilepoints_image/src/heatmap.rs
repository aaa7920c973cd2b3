//! The Heatmap renderer: buckets are blended into a padded canvas as
//! radial kernels, the resulting alpha channel is remapped through a
//! cold→hot palette, and the result is smoothed and cropped back to tile
//! size. There is no UTFGrid counterpart for this style.

use crate::cache::ImageCaches;
use crate::canvas::Canvas;
use crate::color::Color;
use tilepoints_core::Tile;
use tilepoints_geometry::Bucket;

#[derive(Debug, Clone, Copy)]
pub struct HeatmapParams {
	pub point_radius: u32,
	pub cold_colour: Color,
	pub hot_colour: Color,
	pub intensity: f64,
}

impl Default for HeatmapParams {
	fn default() -> Self {
		HeatmapParams {
			point_radius: 8,
			cold_colour: Color::rgb(0x00, 0x00, 0xee),
			hot_colour: Color::rgb(0xee, 0x00, 0x00),
			intensity: 0.5,
		}
	}
}

/// Clamp `ln(total)` (floored to an integer) into `1..=10`: a bucket's
/// contribution to the blended kernel, capped so a handful of very large
/// buckets can't blow out the whole tile.
#[must_use]
pub fn bucket_weight(total: u64) -> u32 {
	let weight = (total as f64).ln().floor() as i64;
	weight.clamp(1, 10) as u32
}

/// Render `buckets` onto `tile` as a blended heat surface, returning an
/// RGBA canvas of side `tile.tile_size`.
pub fn render(tile: &Tile, buckets: &[Bucket], params: &HeatmapParams, caches: &ImageCaches) -> Canvas {
	// `palette[i]` gives the RGB at ramp position `i`; the final pixel's alpha
	// is the kernel alpha itself (`colour_range[i] = (R,G,B,i)`), not the
	// ramp endpoints' alpha, so a fully transparent background stays
	// transparent after the remap.
	let palette = params.cold_colour.range_to(params.hot_colour, 256);
	let point_diameter = params.point_radius * 2;
	let padded_side = tile.tile_size + point_diameter * 2;
	let mut padded = Canvas::new_transparent(padded_side, padded_side);

	for bucket in buckets {
		let (x, y) = tile.pixel_position(bucket.centre_lat, bucket.centre_lon, 1);
		let weight = bucket_weight(bucket.total);
		let kernel = caches.get_heatmap_kernel(params.point_radius, weight, params.intensity);
		let ox = (x + f64::from(params.point_radius)).round() as i64;
		let oy = (y + f64::from(params.point_radius)).round() as i64;
		padded.blend_from(&kernel, ox, oy);
	}

	let mut coloured = Canvas::new_transparent(padded_side, padded_side);
	for y in 0..padded_side {
		for x in 0..padded_side {
			let alpha = padded.get(i64::from(x), i64::from(y))[3];
			let rgb = palette[alpha as usize];
			coloured.set(i64::from(x), i64::from(y), [rgb.r, rgb.g, rgb.b, alpha]);
		}
	}

	let smoothed = smooth(&coloured);
	let diam = i64::from(point_diameter);
	smoothed.crop(diam, diam, diam + i64::from(tile.tile_size), diam + i64::from(tile.tile_size))
}

/// The 5x5 `ImageFilter.SMOOTH_MORE` convolution kernel: a strong centre
/// weight, a ring of moderate weights, and a faint outer ring, divided by
/// 100.
#[rustfmt::skip]
const SMOOTH_MORE: [[i32; 5]; 5] = [
	[1, 1,  1, 1, 1],
	[1, 5,  5, 5, 1],
	[1, 5, 44, 5, 1],
	[1, 5,  5, 5, 1],
	[1, 1,  1, 1, 1],
];
const SMOOTH_MORE_DIVISOR: i32 = 100;

fn smooth(canvas: &Canvas) -> Canvas {
	let mut out = Canvas::new_transparent(canvas.width, canvas.height);
	for y in 0..canvas.height {
		for x in 0..canvas.width {
			let mut sums = [0_i32; 4];
			for (dy, row) in SMOOTH_MORE.iter().enumerate() {
				for (dx, &weight) in row.iter().enumerate() {
					let sx = i64::from(x) + dx as i64 - 2;
					let sy = i64::from(y) + dy as i64 - 2;
					let pixel = canvas.get(sx, sy);
					for (c, sum) in sums.iter_mut().enumerate() {
						*sum += i32::from(pixel[c]) * weight;
					}
				}
			}
			let pixel = [
				(sums[0] / SMOOTH_MORE_DIVISOR).clamp(0, 255) as u8,
				(sums[1] / SMOOTH_MORE_DIVISOR).clamp(0, 255) as u8,
				(sums[2] / SMOOTH_MORE_DIVISOR).clamp(0, 255) as u8,
				(sums[3] / SMOOTH_MORE_DIVISOR).clamp(0, 255) as u8,
			];
			out.set(i64::from(x), i64::from(y), pixel);
		}
	}
	out
}
