//! Colour parsing and linear interpolation.
//!
//! Supports the 3/4/6/8 hex-digit forms, plus a bracket-delimited
//! tuple/list form and `range_to` linear interpolation between two
//! colours.

use tilepoints_core::CoreError;

/// An RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: u8,
}

impl Color {
	#[must_use]
	pub fn rgb(r: u8, g: u8, b: u8) -> Self {
		Color { r, g, b, a: 255 }
	}

	#[must_use]
	pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
		Color { r, g, b, a }
	}

	#[must_use]
	pub fn to_rgba_array(self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}

	/// Parse a colour from a 3/4-int tuple, a `#rgb`/`#rrggbb`(+alpha) hex
	/// string, or a bracket-delimited stringified tuple/list of 3 or 4
	/// comma-separated ints.
	///
	/// # Errors
	/// Returns `CoreError::InvalidColour` for anything else.
	pub fn parse(input: &str) -> Result<Self, CoreError> {
		let trimmed = input.trim();
		if trimmed.starts_with('#') || is_plain_hex(trimmed) {
			return parse_hex_color(trimmed)
				.map_err(|_| CoreError::InvalidColour(input.to_string()))
				.and_then(|bytes| from_channel_bytes(input, &bytes));
		}
		if let Some(inner) = strip_brackets(trimmed) {
			return parse_int_list(input, inner);
		}
		Err(CoreError::InvalidColour(input.to_string()))
	}

	/// `n` evenly spaced colours from `self` to `other` inclusive, linearly
	/// interpolated per channel.
	#[must_use]
	pub fn range_to(self, other: Color, n: usize) -> Vec<Color> {
		if n == 0 {
			return Vec::new();
		}
		if n == 1 {
			return vec![self];
		}
		(0..n)
			.map(|i| {
				let t = i as f64 / (n - 1) as f64;
				Color {
					r: lerp_u8(self.r, other.r, t),
					g: lerp_u8(self.g, other.g, t),
					b: lerp_u8(self.b, other.b, t),
					a: lerp_u8(self.a, other.a, t),
				}
			})
			.collect()
	}
}

fn lerp_u8(from: u8, to: u8, t: f64) -> u8 {
	(f64::from(from) + (f64::from(to) - f64::from(from)) * t).round().clamp(0.0, 255.0) as u8
}

fn is_plain_hex(s: &str) -> bool {
	matches!(s.len(), 3 | 4 | 6 | 8) && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn from_channel_bytes(original: &str, bytes: &[u8]) -> Result<Color, CoreError> {
	match bytes {
		[r, g, b] => Ok(Color::rgb(*r, *g, *b)),
		[r, g, b, a] => Ok(Color::rgba(*r, *g, *b, *a)),
		_ => Err(CoreError::InvalidColour(original.to_string())),
	}
}

/// Parse a hex colour string into RGB or RGBA bytes.
///
/// Supports `"RGB"`/`"RGBA"` short forms and `"RRGGBB"`/`"RRGGBBAA"`, with an
/// optional leading `#`.
fn parse_hex_color(hex: &str) -> Result<Vec<u8>, CoreError> {
	let hex = hex.trim_start_matches('#');

	let expanded = match hex.len() {
		3 | 4 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
		6 | 8 => hex.to_string(),
		_ => return Err(CoreError::InvalidColour(hex.to_string())),
	};

	(0..expanded.len())
		.step_by(2)
		.map(|i| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| CoreError::InvalidColour(hex.to_string())))
		.collect()
}

fn strip_brackets(s: &str) -> Option<&str> {
	for (open, close) in [('(', ')'), ('[', ']')] {
		if let Some(inner) = s.strip_prefix(open).and_then(|rest| rest.strip_suffix(close)) {
			return Some(inner);
		}
	}
	None
}

fn parse_int_list(original: &str, inner: &str) -> Result<Color, CoreError> {
	let parts: Result<Vec<u8>, _> = inner
		.split(',')
		.map(|part| part.trim().parse::<u8>())
		.collect();
	match parts {
		Ok(bytes) => from_channel_bytes(original, &bytes),
		Err(_) => Err(CoreError::InvalidColour(original.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_short_and_long_hex() {
		assert_eq!(Color::parse("#F00").unwrap(), Color::rgb(255, 0, 0));
		assert_eq!(Color::parse("FF5733").unwrap(), Color::rgb(255, 87, 51));
		assert_eq!(Color::parse("#FF573380").unwrap(), Color::rgba(255, 87, 51, 128));
	}

	#[test]
	fn parses_bracketed_tuples_and_lists() {
		assert_eq!(Color::parse("(238,0,0)").unwrap(), Color::rgb(238, 0, 0));
		assert_eq!(Color::parse("[238, 0, 0, 128]").unwrap(), Color::rgba(238, 0, 0, 128));
	}

	#[test]
	fn rejects_malformed_colours() {
		assert!(Color::parse("not-a-colour").is_err());
		assert!(Color::parse("#GG0000").is_err());
		assert!(Color::parse("(1,2)").is_err());
		assert!(Color::parse("(1,2,3,4,5)").is_err());
		assert!(Color::parse("(1,2,300)").is_err());
	}

	#[test]
	fn range_to_interpolates_linearly_and_hits_both_ends() {
		let cold = Color::rgb(0, 0, 0xee);
		let hot = Color::rgb(0xee, 0, 0);
		let range = cold.range_to(hot, 3);
		assert_eq!(range.len(), 3);
		assert_eq!(range[0], cold);
		assert_eq!(range[2], hot);
		assert_eq!(range[1].r, 0x77);
		assert_eq!(range[1].b, 0x77);
	}

	#[test]
	fn range_to_of_one_returns_the_start_colour() {
		let cold = Color::rgb(1, 2, 3);
		assert_eq!(cold.range_to(Color::rgb(9, 9, 9), 1), vec![cold]);
	}
}
