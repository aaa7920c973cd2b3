//! Builds the aggregation search body sent to the backing store and parses
//! its response into ordered `Bucket`s.

use tilepoints_core::json::{JsonArray, JsonObject, JsonValue};
use tilepoints_core::{CoreError, Tile, lat_lon_clamp};
use tilepoints_geometry::Bucket;

/// Backing-store aggregation bucket cap (§4.D): large enough that a tile's
/// geohash cells are never truncated at any zoom this service serves.
const BUCKET_CAP: u32 = 15_000;

/// Build the search body: a `geo_bounding_box` filter over `tile`'s padded
/// extent, optionally AND-composed with `search` as an extra filter clause,
/// plus the primary `geohash_grid` aggregation with a nested top-1
/// `top_hits` to get each bucket's representative record.
#[must_use]
pub fn build_query_body(tile: &Tile, search: Option<&JsonObject>) -> JsonObject {
	let (top_lat, top_lon) = {
		let (lat, lon) = tile.top_left(0.01);
		lat_lon_clamp(lat, lon)
	};
	let (bottom_lat, bottom_lon) = {
		let (lat, lon) = tile.bottom_right(0.01);
		lat_lon_clamp(lat, lon)
	};

	let mut geo_bounding_box = JsonObject::new();
	geo_bounding_box.set(
		"meta.geo",
		JsonObject::from(vec![
			("top_left", JsonValue::from(format!("{top_lat}, {top_lon}"))),
			("bottom_right", JsonValue::from(format!("{bottom_lat}, {bottom_lon}"))),
		]),
	);

	let mut filter = JsonArray::from(vec![JsonValue::Object(JsonObject::from(vec![(
		"geo_bounding_box",
		JsonValue::Object(geo_bounding_box),
	)]))]);
	if let Some(search) = search {
		filter.push(JsonValue::Object(search.clone()));
	}

	let mut bool_query = JsonObject::new();
	bool_query.set("filter", filter);

	let mut query = JsonObject::new();
	query.set("bool", bool_query);

	let mut geohash_grid = JsonObject::new();
	geohash_grid
		.set("field", "meta.geo")
		.set("precision", u32::from(tile.precision()))
		.set("size", BUCKET_CAP);

	let mut top_hits = JsonObject::new();
	top_hits.set("size", 1_u32);
	let mut first = JsonObject::new();
	first.set("top_hits", top_hits);
	let mut first_agg = JsonObject::new();
	first_agg.set("first", first);

	let mut grid = JsonObject::new();
	grid.set("geohash_grid", geohash_grid).set("aggs", first_agg);

	let mut aggs = JsonObject::new();
	aggs.set("grid", grid);

	let mut body = JsonObject::new();
	body.set("size", 0_u32).set("query", query).set("aggs", aggs);
	body
}

/// Parse a backing-store response body into ordered `Bucket`s, preserving
/// the descending-count order the aggregation returns.
///
/// # Errors
/// Returns `CoreError::UpstreamMalformed` if the response doesn't have the
/// expected `aggregations.grid.buckets[]` shape, or if any bucket's
/// geohash key is invalid.
pub fn parse_response(body: &JsonValue) -> Result<Vec<Bucket>, CoreError> {
	let malformed = |msg: String| CoreError::UpstreamMalformed(msg);

	let object = body.as_object().map_err(|e| malformed(e.to_string()))?;
	let aggregations = object.get_object("aggregations").map_err(|e| malformed(e.to_string()))?;
	let grid = aggregations.get_object("grid").map_err(|e| malformed(e.to_string()))?;
	let buckets = grid.get_array("buckets").map_err(|e| malformed(e.to_string()))?;

	buckets
		.as_vec()
		.iter()
		.map(|entry| {
			let entry = entry.as_object().map_err(|e| malformed(e.to_string()))?;
			let key = entry.get_string("key").map_err(|e| malformed(e.to_string()))?;
			let total: u64 = entry.get_number("doc_count").map_err(|e| malformed(e.to_string()))?;
			let first_record = first_hit_source(entry).map_err(|e| malformed(e.to_string()))?;
			Bucket::new(key, total, first_record).map_err(|e| malformed(e.to_string()))
		})
		.collect()
}

fn first_hit_source(bucket_entry: &JsonObject) -> anyhow::Result<JsonValue> {
	let hits = bucket_entry.get_object("first")?.get_object("hits")?.get_array("hits")?;
	let hit = hits.as_vec().first().ok_or_else(|| anyhow::anyhow!("bucket has no representative hit"))?;
	Ok(hit.as_object()?.get("_source").cloned().unwrap_or(JsonValue::Null))
}
