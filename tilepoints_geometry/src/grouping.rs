//! Shared cell-grouping used by both the gridded PNG renderer and the
//! gridded UTFGrid marks: bucket centres are binned into `grid_resolution`
//! sized cells over the tile's full pixel extent.

use crate::bucket::Bucket;
use std::collections::HashMap;
use tilepoints_core::Tile;

/// One non-empty grid cell: its grid coordinates, the summed count of every
/// bucket that landed in it, and the index (into the original bucket slice)
/// of the first bucket assigned — "first" meaning first in backing-store
/// order, i.e. highest count first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
	pub gx: u32,
	pub gy: u32,
	pub count: u64,
	pub first_bucket: usize,
}

/// Group `buckets` into cells of side `grid_resolution` pixels across the
/// whole tile. Returned in the order cells were first populated. Buckets
/// whose centre lands outside the tile's pixel extent are dropped.
#[must_use]
pub fn group_into_cells(tile: &Tile, buckets: &[Bucket], grid_resolution: u32) -> Vec<GridCell> {
	let grid_size = tile.tile_size / grid_resolution;
	let mut cells: Vec<GridCell> = Vec::new();
	let mut index: HashMap<(u32, u32), usize> = HashMap::new();

	for (i, bucket) in buckets.iter().enumerate() {
		let (px, py) = tile.pixel_position(bucket.centre_lat, bucket.centre_lon, 1);
		let gx = (px / f64::from(grid_resolution)).floor();
		let gy = (py / f64::from(grid_resolution)).floor();
		if gx < 0.0 || gy < 0.0 || gx >= f64::from(grid_size) || gy >= f64::from(grid_size) {
			continue;
		}
		let key = (gx as u32, gy as u32);
		if let Some(&pos) = index.get(&key) {
			cells[pos].count += bucket.total;
		} else {
			index.insert(key, cells.len());
			cells.push(GridCell {
				gx: key.0,
				gy: key.1,
				count: bucket.total,
				first_bucket: i,
			});
		}
	}

	cells
}

#[cfg(test)]
mod tests {
	use super::*;
	use tilepoints_core::json::JsonValue;

	fn bucket_at(tile: &Tile, lat: f64, lon: f64, total: u64) -> Bucket {
		Bucket {
			key: "x".into(),
			centre_lat: lat,
			centre_lon: lon,
			total,
			first_record: JsonValue::Null,
			bbox: crate::bucket::BBox { w: lon, e: lon, n: lat, s: lat },
		}
	}

	#[test]
	fn buckets_in_the_same_cell_accumulate() {
		let tile = Tile::with_default_size(6, 20, 20);
		let (mid_lat, mid_lon) = tile.middle();
		let buckets = vec![
			bucket_at(&tile, mid_lat, mid_lon, 3),
			bucket_at(&tile, mid_lat, mid_lon, 5),
		];
		let cells = group_into_cells(&tile, &buckets, 8);
		assert_eq!(cells.len(), 1);
		assert_eq!(cells[0].count, 8);
		assert_eq!(cells[0].first_bucket, 0);
	}

	#[test]
	fn out_of_tile_buckets_are_dropped() {
		let tile = Tile::with_default_size(6, 20, 20);
		let buckets = vec![bucket_at(&tile, -80.0, 170.0, 1)];
		let cells = group_into_cells(&tile, &buckets, 8);
		assert!(cells.is_empty());
	}

	#[test]
	fn cells_are_returned_in_first_seen_order() {
		let tile = Tile::with_default_size(6, 20, 20);
		let (mid_lat, mid_lon) = tile.middle();
		let (tl_lat, tl_lon) = tile.top_left(0.0);
		let buckets = vec![
			bucket_at(&tile, tl_lat + 0.001, tl_lon + 0.001, 1),
			bucket_at(&tile, mid_lat, mid_lon, 1),
		];
		let cells = group_into_cells(&tile, &buckets, 8);
		assert_eq!(cells.len(), 2);
		assert_eq!(cells[0].first_bucket, 0);
		assert_eq!(cells[1].first_bucket, 1);
	}
}
