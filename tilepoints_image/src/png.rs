//! PNG encoding: a `speed` (0..=100) hint maps to a `(CompressionType,
//! FilterType)` bucket, and a fully-opaque image is encoded without its
//! alpha channel.

use anyhow::Result;
use image::codecs::png::{self, CompressionType, FilterType};
use image::{ColorType, ImageEncoder, RgbaImage};

fn speed_to_png_params(speed: u8) -> (CompressionType, FilterType) {
	match speed.clamp(0, 100) {
		0..20 => (CompressionType::Best, FilterType::Adaptive),
		20..40 => (CompressionType::Default, FilterType::Adaptive),
		40..60 => (CompressionType::Default, FilterType::Paeth),
		60..80 => (CompressionType::Default, FilterType::Avg),
		80..90 => (CompressionType::Fast, FilterType::Avg),
		_ => (CompressionType::Fast, FilterType::NoFilter),
	}
}

fn is_opaque(image: &RgbaImage) -> bool {
	image.pixels().all(|p| p.0[3] == 255)
}

fn drop_alpha(image: &RgbaImage) -> image::RgbImage {
	image::RgbImage::from_fn(image.width(), image.height(), |x, y| {
		let p = image.get_pixel(x, y).0;
		image::Rgb([p[0], p[1], p[2]])
	})
}

/// Encode an RGBA canvas to PNG bytes. `speed` defaults to 10 (strong
/// compression) when `None`. Fully opaque images are encoded as RGB,
/// dropping the wasted alpha channel.
///
/// # Errors
/// Propagates any error from the underlying PNG encoder.
pub fn encode(image: &RgbaImage, speed: Option<u8>) -> Result<Vec<u8>> {
	let (compression_type, filter_type) = speed_to_png_params(speed.unwrap_or(10));
	let mut buffer = Vec::new();
	let encoder = png::PngEncoder::new_with_quality(&mut buffer, compression_type, filter_type);

	if is_opaque(image) {
		let rgb = drop_alpha(image);
		encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8.into())?;
	} else {
		encoder.write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8.into())?;
	}

	Ok(buffer)
}
