//! Grow-only, single-flight caches for the two small images every bucket
//! reuses: the plot/gridded point stamp, and the heatmap radial kernel.
//!
//! `moka::sync::Cache` with `get_with` gives the single-flight guarantee a
//! naive mutex-guarded `HashMap` doesn't: concurrent misses for the same
//! key block on one computation rather than racing to recompute it.

use crate::canvas::Canvas;
use crate::color::Color;
use moka::sync::Cache;

type PointKey = (u32, u32, u32, Color, Option<Color>);
type HeatmapKey = (u32, u32, u64);

pub struct ImageCaches {
	points: Cache<PointKey, Canvas>,
	heatmap_kernels: Cache<HeatmapKey, Canvas>,
}

impl ImageCaches {
	/// Both caches are unbounded: the key space is the handful of distinct
	/// `(radius, border_width, resize_factor, colour...)` combinations a
	/// running server actually sees, never evicting is cheaper than
	/// re-rendering a stamp, and `max_capacity` would impose an LRU policy
	/// we don't want.
	#[must_use]
	pub fn new() -> Self {
		ImageCaches {
			points: Cache::builder().build(),
			heatmap_kernels: Cache::builder().build(),
		}
	}

	/// A point stamp of side `d = 2 * radius * resize_factor`: an optional
	/// outer border ellipse, then an inner fill ellipse.
	pub fn get_point(&self, radius: u32, border_width: u32, resize_factor: u32, fill: Color, border: Option<Color>) -> Canvas {
		let key = (radius, border_width, resize_factor, fill, border);
		self.points.get_with(key, || draw_point(radius, border_width, resize_factor, fill, border))
	}

	/// A `d × d` (`d = 2 * radius`) radial alpha kernel for the heatmap
	/// renderer. `intensity` is keyed on its exact bit pattern since it's
	/// always drawn from a small, repeated set of request parameters.
	pub fn get_heatmap_kernel(&self, radius: u32, weight: u32, intensity: f64) -> Canvas {
		let key = (radius, weight, intensity.to_bits());
		self.heatmap_kernels.get_with(key, || draw_heatmap_kernel(radius, weight, intensity))
	}
}

impl Default for ImageCaches {
	fn default() -> Self {
		Self::new()
	}
}

fn draw_point(radius: u32, border_width: u32, resize_factor: u32, fill: Color, border: Option<Color>) -> Canvas {
	let d = 2 * radius * resize_factor;
	let mut canvas = Canvas::new_transparent(d, d);
	let d = i64::from(d);

	if border_width > 0 {
		if let Some(border) = border {
			canvas.fill_ellipse(0, 0, d - 1, d - 1, border.to_rgba_array());
		}
	}

	let bw = i64::from(border_width * resize_factor);
	canvas.fill_ellipse(bw, bw, d - 1 - bw, d - 1 - bw, fill.to_rgba_array());
	canvas
}

fn draw_heatmap_kernel(radius: u32, weight: u32, intensity: f64) -> Canvas {
	let d = 2 * radius;
	let mut canvas = Canvas::new_transparent(d, d);
	let r = f64::from(radius);
	for y in 0..d {
		for x in 0..d {
			let dx = f64::from(x) - r;
			let dy = f64::from(y) - r;
			let delta = (dx * dx + dy * dy).sqrt() / (r * std::f64::consts::SQRT_2);
			let alpha = (255.0 * (intensity - delta).max(0.0)) * f64::from(weight);
			let alpha = alpha.round().clamp(0.0, 255.0) as u8;
			if alpha > 0 {
				canvas.set(i64::from(x), i64::from(y), [0, 0, 0, alpha]);
			}
		}
	}
	canvas
}
