//! The `Bucket`: one geohash cell from a spatial aggregation, with its
//! count and a representative document.

use crate::geohash;
use anyhow::{Context, Result, bail};
use tilepoints_core::json::{JsonArray, JsonObject, JsonValue};

/// A bucket's bounding box, derived from its geohash cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
	pub w: f64,
	pub e: f64,
	pub n: f64,
	pub s: f64,
}

/// One aggregation cell: a geohash key, its decoded centre, the number of
/// underlying records, and one representative document.
#[derive(Debug, Clone)]
pub struct Bucket {
	pub key: String,
	pub centre_lat: f64,
	pub centre_lon: f64,
	pub total: u64,
	pub first_record: JsonValue,
	pub bbox: BBox,
}

impl Bucket {
	/// Build a bucket from a raw backing-store aggregation entry.
	///
	/// # Errors
	/// Returns an error if `key` isn't a valid geohash or `total` is zero.
	pub fn new(key: String, total: u64, first_record: JsonValue) -> Result<Self> {
		if total == 0 {
			bail!("bucket '{key}' has a total of zero, expected at least one record");
		}
		let cell = geohash::decode(&key).with_context(|| format!("decoding geohash key '{key}'"))?;
		let (centre_lat, centre_lon) = cell.centre();
		Ok(Bucket {
			key,
			centre_lat,
			centre_lon,
			total,
			first_record,
			bbox: BBox {
				w: cell.west,
				e: cell.east,
				n: cell.north,
				s: cell.south,
			},
		})
	}

	/// The bucket's bounding box as a GeoJSON `Polygon`, ring NW, NE, SE, SW,
	/// closed (first point repeated as last).
	#[must_use]
	pub fn as_geojson_polygon(&self) -> JsonValue {
		let ring = [
			(self.bbox.w, self.bbox.n),
			(self.bbox.e, self.bbox.n),
			(self.bbox.e, self.bbox.s),
			(self.bbox.w, self.bbox.s),
			(self.bbox.w, self.bbox.n),
		];
		let coordinates = JsonArray(
			ring
				.iter()
				.map(|&(lon, lat)| JsonValue::Array(JsonArray::from(vec![lon, lat])))
				.collect::<Vec<_>>(),
		);
		JsonValue::Object(JsonObject::from(vec![
			("type", JsonValue::from("Polygon")),
			("coordinates", JsonValue::Array(JsonArray(vec![JsonValue::Array(coordinates)]))),
		]))
	}

	/// Parse `"<lat>,<lon>"` out of this bucket's representative record's
	/// `meta.geo` field.
	///
	/// # Errors
	/// Returns an error if `meta.geo` is missing or not a well-formed
	/// `"lat,lon"` string.
	pub fn record_lat_lon(&self) -> Result<(f64, f64)> {
		let meta = self.first_record.as_object()?.get_object("meta")?;
		let geo = meta.get_string("geo")?;
		let (lat_str, lon_str) = geo.split_once(',').context("meta.geo is not a 'lat,lon' pair")?;
		let lat: f64 = lat_str.trim().parse().context("meta.geo latitude is not a number")?;
		let lon: f64 = lon_str.trim().parse().context("meta.geo longitude is not a number")?;
		Ok((lat, lon))
	}
}
