//! Web-mercator tile geometry: slippy-map `(z, x, y)` coordinates, the
//! projection to and from EPSG:3857, and the geohash precision a tile should
//! query at.

use std::f64::consts::PI;

/// Mercator latitude clamp; beyond this the projection diverges.
pub const LAT_LIMIT: f64 = 85.0511;

/// Clamp `value` into `[minimum, maximum]`.
#[must_use]
pub fn clamp(value: f64, minimum: f64, maximum: f64) -> f64 {
	value.max(minimum).min(maximum)
}

/// `true` iff `n` is a strictly positive power of two.
#[must_use]
pub fn is_power_of_two(n: u32) -> bool {
	n != 0 && (n & (n - 1)) == 0
}

/// Wrap a longitude into `[-180, 180]`.
#[must_use]
pub fn wrap_longitude(lon: f64) -> f64 {
	((lon + 180.0).rem_euclid(360.0)) - 180.0
}

/// Clamp a latitude into `[-LAT_LIMIT, LAT_LIMIT]` and wrap a longitude into
/// `[-180, 180]`.
#[must_use]
pub fn lat_lon_clamp(lat: f64, lon: f64) -> (f64, f64) {
	(clamp(lat, -LAT_LIMIT, LAT_LIMIT), wrap_longitude(lon))
}

/// `x` tile-fraction of a longitude at zoom `z` (not rounded to a tile index).
#[must_use]
pub fn lon_to_x(lon: f64, z: u8) -> f64 {
	((lon + 180.0) / 360.0) * f64::from(1_u32 << z)
}

/// `y` tile-fraction of a latitude at zoom `z`, clamping latitude to the
/// mercator limit first.
#[must_use]
pub fn lat_to_y(lat: f64, z: u8) -> f64 {
	let lat = clamp(lat, -LAT_LIMIT, LAT_LIMIT);
	let phi = lat.to_radians();
	(1.0 - (phi.tan() + 1.0 / phi.cos()).ln() / PI) / 2.0 * f64::from(1_u32 << z)
}

/// Inverse projection: tile-fraction coordinates back to `(lat, lon)`.
#[must_use]
pub fn translate(x: f64, y: f64, z: u8) -> (f64, f64) {
	let n = f64::from(1_u32 << z);
	let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
	let lon = (x / n) * 360.0 - 180.0;
	(lat, lon)
}

/// Geohash precision to request from the backing aggregation, as a pure
/// function of (clamped) zoom: keep cells sub-pixel at high zoom, bounded
/// in count at low zoom.
#[must_use]
pub fn precision_for_zoom(z: u8) -> u8 {
	match z.min(19) {
		0 | 1 => 3,
		2 | 3 => 4,
		4 | 5 => 5,
		6 | 7 => 6,
		8 | 9 => 7,
		10 => 8,
		11 | 12 => 9,
		13 | 14 => 10,
		15 | 16 | 17 => 11,
		_ => 12,
	}
}

/// An immutable slippy-map tile coordinate plus the pixel size it renders
/// at. `0 ≤ x, y < 2^z` is enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
	pub z: u8,
	pub x: u32,
	pub y: u32,
	pub tile_size: u32,
}

impl Tile {
	/// # Panics
	/// Panics if `x` or `y` is out of range for `z` — callers are expected to
	/// have validated request path parameters already (see the HTTP layer's
	/// own bounds check, which returns `400` rather than reaching here).
	#[must_use]
	pub fn new(z: u8, x: u32, y: u32, tile_size: u32) -> Self {
		let size = 1_u32 << z.min(31);
		assert!(x < size && y < size, "tile coordinate ({x},{y}) out of range for z={z}");
		Tile { z, x, y, tile_size }
	}

	#[must_use]
	pub fn with_default_size(z: u8, x: u32, y: u32) -> Self {
		Tile::new(z, x, y, 256)
	}

	#[must_use]
	pub fn precision(&self) -> u8 {
		precision_for_zoom(self.z)
	}

	/// `translate(x + dx, y + dy, z)`, expanded outward by `extra` tile-count
	/// fractions on both axes.
	fn corner(&self, dx: f64, dy: f64, extra: f64) -> (f64, f64) {
		let sign_x = if dx > 0.5 { 1.0 } else { -1.0 };
		let sign_y = if dy > 0.5 { 1.0 } else { -1.0 };
		translate(
			f64::from(self.x) + dx + sign_x * extra,
			f64::from(self.y) + dy + sign_y * extra,
			self.z,
		)
	}

	#[must_use]
	pub fn top_left(&self, extra: f64) -> (f64, f64) {
		self.corner(0.0, 0.0, extra)
	}

	#[must_use]
	pub fn top_right(&self, extra: f64) -> (f64, f64) {
		self.corner(1.0, 0.0, extra)
	}

	#[must_use]
	pub fn bottom_left(&self, extra: f64) -> (f64, f64) {
		self.corner(0.0, 1.0, extra)
	}

	#[must_use]
	pub fn bottom_right(&self, extra: f64) -> (f64, f64) {
		self.corner(1.0, 1.0, extra)
	}

	#[must_use]
	pub fn middle(&self) -> (f64, f64) {
		translate(f64::from(self.x) + 0.5, f64::from(self.y) + 0.5, self.z)
	}

	/// Project `(lat, lon)` into pixel coordinates within this tile's canvas
	/// at the given `resize_factor`, where `(0,0)` is the canvas's top-left.
	#[must_use]
	pub fn pixel_position(&self, lat: f64, lon: f64, resize_factor: u32) -> (f64, f64) {
		let w = f64::from(self.tile_size * resize_factor);
		let (mid_lat, mid_lon) = self.middle();
		let x = (lon_to_x(lon, self.z) - lon_to_x(mid_lon, self.z)) * w + w / 2.0;
		let y = (lat_to_y(lat, self.z) - lat_to_y(mid_lat, self.z)) * w + w / 2.0;
		(x, y)
	}
}
