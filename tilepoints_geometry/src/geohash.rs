//! Geohash decoding: a base-32 string to a bounding box and its centre.
//!
//! Not sourced from a crate — nothing in the workspace's dependency stack
//! covers it, and the algorithm (bit-interleaved binary search over
//! longitude/latitude ranges) is small enough to own directly.

use anyhow::{Result, bail};

const BASE32: &[u8] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// A decoded geohash cell: its bounding box in `(west, east, south, north)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeohashBox {
	pub west: f64,
	pub east: f64,
	pub south: f64,
	pub north: f64,
}

impl GeohashBox {
	#[must_use]
	pub fn centre(&self) -> (f64, f64) {
		((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
	}
}

fn base32_value(c: u8) -> Result<u32> {
	BASE32
		.iter()
		.position(|&b| b == c)
		.map(|p| p as u32)
		.ok_or_else(|| anyhow::anyhow!("invalid geohash character '{}'", c as char))
}

/// Decode a geohash string into its bounding box.
///
/// # Errors
/// Returns an error if `hash` is empty or contains a character outside the
/// geohash base-32 alphabet.
pub fn decode(hash: &str) -> Result<GeohashBox> {
	if hash.is_empty() {
		bail!("empty geohash");
	}

	let mut lon_range = (-180.0_f64, 180.0_f64);
	let mut lat_range = (-90.0_f64, 90.0_f64);
	let mut is_lon = true;

	for &byte in hash.as_bytes() {
		let value = base32_value(byte.to_ascii_lowercase())?;
		for bit in (0..5).rev() {
			let set = (value >> bit) & 1 == 1;
			if is_lon {
				let mid = (lon_range.0 + lon_range.1) / 2.0;
				if set {
					lon_range.0 = mid;
				} else {
					lon_range.1 = mid;
				}
			} else {
				let mid = (lat_range.0 + lat_range.1) / 2.0;
				if set {
					lat_range.0 = mid;
				} else {
					lat_range.1 = mid;
				}
			}
			is_lon = !is_lon;
		}
	}

	Ok(GeohashBox {
		west: lon_range.0,
		east: lon_range.1,
		south: lat_range.0,
		north: lat_range.1,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;

	#[test]
	fn decodes_a_known_geohash() {
		// "ezs42" is the canonical worked example from the geohash wikipedia
		// article: centre approximately (42.6, -5.6).
		let b = decode("ezs42").unwrap();
		let (lat, lon) = b.centre();
		assert_abs_diff_eq!(lat, 42.6, epsilon = 0.1);
		assert_abs_diff_eq!(lon, -5.6, epsilon = 0.1);
	}

	#[test]
	fn longer_hash_gives_a_smaller_box() {
		let short = decode("u").unwrap();
		let long = decode("u0mwd").unwrap();
		assert!((long.east - long.west) < (short.east - short.west));
		assert!((long.north - long.south) < (short.north - short.south));
	}

	#[test]
	fn rejects_invalid_characters() {
		assert!(decode("a!0").is_err());
		assert!(decode("").is_err());
	}

	#[test]
	fn box_is_well_formed() {
		let b = decode("gcnc6vgcp6").unwrap();
		assert!(b.west <= b.east);
		assert!(b.south <= b.north);
	}
}
