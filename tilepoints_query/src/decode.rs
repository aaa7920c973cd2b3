//! Decodes the `query` HTTP knob: a URL-safe-base64, gzip-compressed JSON
//! document `{"indexes": [...], "search": {...}}`, taking priority over
//! standalone `indexes`/`search` parameters when present.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use std::io::Read;
use tilepoints_core::json::{JsonObject, JsonValue};

/// A decoded `query` knob: the index list and an optional inner search
/// clause to AND-compose with the tile's geo filter.
pub struct DecodedQuery {
	pub indexes: Vec<String>,
	pub search: Option<JsonObject>,
}

/// Decode `raw` as base64 → gzip → JSON and extract `indexes`/`search`.
///
/// # Errors
/// Returns an error if any stage of the decode chain fails, or if the
/// decoded document is missing `indexes`.
pub fn decode_query_param(raw: &str) -> Result<DecodedQuery> {
	let compressed = URL_SAFE.decode(raw).context("query parameter is not valid URL-safe base64")?;
	let mut decoder = flate2::read::GzDecoder::new(&compressed[..]);
	let mut json_bytes = Vec::new();
	decoder.read_to_end(&mut json_bytes).context("query parameter is not valid gzip")?;
	let json_text = String::from_utf8(json_bytes).context("decompressed query parameter is not valid UTF-8")?;

	let object = JsonValue::parse_str(&json_text)
		.context("decompressed query parameter is not valid JSON")?
		.into_object()
		.context("decompressed query parameter is not a JSON object")?;

	let indexes = object
		.get_array("indexes")
		.context("query parameter is missing 'indexes'")?
		.as_string_vec()
		.context("'indexes' must be an array of strings")?
		.into_iter()
		.map(|s| s.trim().to_string())
		.collect();

	let search = match object.get("search") {
		Some(JsonValue::Object(search)) => Some(search.clone()),
		_ => None,
	};

	Ok(DecodedQuery { indexes, search })
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn encode_query(json: &str) -> String {
		let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
		encoder.write_all(json.as_bytes()).unwrap();
		let compressed = encoder.finish().unwrap();
		URL_SAFE.encode(compressed)
	}

	#[test]
	fn decodes_a_compressed_index_list_and_search_clause() {
		let raw = encode_query(r#"{"indexes":["a","b"],"search":{"term":{"x":1}}}"#);
		let decoded = decode_query_param(&raw).unwrap();
		assert_eq!(decoded.indexes, vec!["a", "b"]);
		assert!(decoded.search.is_some());
	}

	#[test]
	fn decodes_an_index_list_with_no_search_clause() {
		let raw = encode_query(r#"{"indexes":["a"]}"#);
		let decoded = decode_query_param(&raw).unwrap();
		assert_eq!(decoded.indexes, vec!["a"]);
		assert!(decoded.search.is_none());
	}

	#[test]
	fn rejects_malformed_base64() {
		assert!(decode_query_param("not base64!!!").is_err());
	}

	#[test]
	fn rejects_a_document_missing_indexes() {
		let raw = encode_query(r#"{"search":{}}"#);
		assert!(decode_query_param(&raw).is_err());
	}
}
