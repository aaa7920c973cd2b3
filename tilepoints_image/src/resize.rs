//! Box-filter downsampling: a `fast_image_resize` `Resizer` driven by
//! `ResizeAlg::Convolution(FilterType::Box)`.

use crate::canvas::Canvas;
use anyhow::Result;
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::DynamicImage;
use tilepoints_derive::context;

#[context("box-downsampling {}x{} to {}x{}", canvas.width, canvas.height, target_width, target_height)]
pub fn box_downsample(canvas: &Canvas, target_width: u32, target_height: u32) -> Result<Canvas> {
	let src = DynamicImage::ImageRgba8(canvas.clone().into_rgba_image());
	let mut dst = DynamicImage::new(target_width, target_height, src.color());
	Resizer::new().resize(
		&src,
		&mut dst,
		&ResizeOptions::default().resize_alg(ResizeAlg::Convolution(FilterType::Box)),
	)?;
	Ok(Canvas::from_rgba_image(&dst.to_rgba8()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn downsampling_halves_a_solid_colour_canvas_without_changing_it() {
		let mut canvas = Canvas::new_transparent(8, 8);
		for y in 0..8 {
			for x in 0..8 {
				canvas.set(x, y, [200, 50, 10, 255]);
			}
		}
		let out = box_downsample(&canvas, 4, 4).unwrap();
		assert_eq!(out.width, 4);
		assert_eq!(out.height, 4);
		assert_eq!(out.get(0, 0), [200, 50, 10, 255]);
	}
}
