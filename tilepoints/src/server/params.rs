//! Parses the HTTP query-string knobs into a `Style` and an index/search
//! pair, per the external interface's `style`/`indexes`/`query`/`search`
//! parameters and their style-specific defaults.

use serde::Deserialize;
use tilepoints_core::json::JsonObject;
use tilepoints_core::json::JsonValue;
use tilepoints_core::CoreError;
use tilepoints_image::{Color, GriddedParams, HeatmapParams, PlotParams, Style};
use tilepoints_query::decode_query_param;

use super::error::ApiError;

/// Raw query-string parameters, deserialized once per request by axum's
/// `Query` extractor. Everything is a string or primitive so invalid
/// values (a bad colour, an out-of-range style) can be turned into a
/// precise `CoreError` rather than a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RawQuery {
	pub style: Option<String>,
	pub indexes: Option<String>,
	pub query: Option<String>,
	pub search: Option<String>,

	pub point_radius: Option<u32>,
	pub border_width: Option<u32>,
	pub resize_factor: Option<u32>,
	pub point_colour: Option<String>,
	pub border_colour: Option<String>,

	pub grid_resolution: Option<u32>,
	pub cold_colour: Option<String>,
	pub hot_colour: Option<String>,
	pub range_size: Option<usize>,
	pub intensity: Option<f64>,

	pub point_width: Option<u32>,

	pub with_background: Option<bool>,
}

fn parse_colour(raw: &Option<String>, default: Color) -> Result<Color, CoreError> {
	match raw {
		Some(text) => Color::parse(text),
		None => Ok(default),
	}
}

/// Parse `style` (and its style-specific knobs) into a `Style`, defaulting
/// to `plot` when absent.
pub fn parse_style(raw: &RawQuery) -> Result<Style, ApiError> {
	let name = raw.style.as_deref().unwrap_or("plot");
	let style = match name {
		"plot" => {
			let defaults = PlotParams::default();
			Style::Plot(PlotParams {
				point_radius: raw.point_radius.unwrap_or(defaults.point_radius),
				border_width: raw.border_width.unwrap_or(defaults.border_width),
				resize_factor: raw.resize_factor.unwrap_or(defaults.resize_factor),
				point_colour: parse_colour(&raw.point_colour, defaults.point_colour)?,
				border_colour: parse_colour(&raw.border_colour, defaults.border_colour)?,
			})
		}
		"gridded" => {
			let defaults = GriddedParams::default();
			Style::Gridded(GriddedParams {
				grid_resolution: raw.grid_resolution.unwrap_or(defaults.grid_resolution),
				cold_colour: parse_colour(&raw.cold_colour, defaults.cold_colour)?,
				hot_colour: parse_colour(&raw.hot_colour, defaults.hot_colour)?,
				range_size: raw.range_size.unwrap_or(defaults.range_size),
				resize_factor: raw.resize_factor.unwrap_or(defaults.resize_factor),
			})
		}
		"heatmap" => {
			let defaults = HeatmapParams::default();
			Style::Heatmap(HeatmapParams {
				point_radius: raw.point_radius.unwrap_or(defaults.point_radius),
				cold_colour: parse_colour(&raw.cold_colour, defaults.cold_colour)?,
				hot_colour: parse_colour(&raw.hot_colour, defaults.hot_colour)?,
				intensity: raw.intensity.unwrap_or(defaults.intensity),
			})
		}
		other => return Err(CoreError::InvalidStyle(other.to_string()).into()),
	};
	Ok(style)
}

/// UTFGrid `grid_resolution`/`point_width` defaults differ by style: plot
/// marks are sparser (resolution 4, width 3) than gridded cells
/// (resolution 8, width 1), which are already grid-aligned.
pub fn utfgrid_defaults(style: &Style, raw: &RawQuery) -> (u32, u32) {
	let (default_resolution, default_width) = match style {
		Style::Plot(_) => (4, 3),
		Style::Gridded(_) | Style::Heatmap(_) => (8, 1),
	};
	(
		raw.grid_resolution.unwrap_or(default_resolution),
		raw.point_width.unwrap_or(default_width),
	)
}

/// Resolve the index list and optional search clause: `query` (a
/// compressed, base64-encoded document) takes priority over standalone
/// `indexes`/`search` parameters when present. An empty or absent index
/// list is a `MissingIndex` error.
pub fn parse_indexes_and_search(raw: &RawQuery) -> Result<(Vec<String>, Option<JsonObject>), ApiError> {
	if let Some(encoded) = &raw.query {
		let decoded = decode_query_param(encoded).map_err(|err| ApiError::BadRequest(err.to_string()))?;
		if decoded.indexes.is_empty() {
			return Err(CoreError::MissingIndex.into());
		}
		return Ok((decoded.indexes, decoded.search));
	}

	let indexes: Vec<String> = raw
		.indexes
		.as_deref()
		.unwrap_or("")
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect();

	if indexes.is_empty() {
		return Err(CoreError::MissingIndex.into());
	}

	let search = match &raw.search {
		Some(text) => {
			let value = JsonValue::parse_str(text).map_err(|err| ApiError::BadRequest(format!("'search' is not valid JSON: {err}")))?;
			Some(
				value
					.into_object()
					.map_err(|_| ApiError::BadRequest("'search' must be a JSON object".to_string()))?,
			)
		}
		None => None,
	};

	Ok((indexes, search))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn raw() -> RawQuery {
		RawQuery {
			style: None,
			indexes: None,
			query: None,
			search: None,
			point_radius: None,
			border_width: None,
			resize_factor: None,
			point_colour: None,
			border_colour: None,
			grid_resolution: None,
			cold_colour: None,
			hot_colour: None,
			range_size: None,
			intensity: None,
			point_width: None,
			with_background: None,
		}
	}

	#[test]
	fn defaults_to_plot_style() {
		assert!(matches!(parse_style(&raw()).unwrap(), Style::Plot(_)));
	}

	#[test]
	fn unknown_style_is_rejected() {
		let mut query = raw();
		query.style = Some("bogus".to_string());
		assert!(matches!(parse_style(&query), Err(ApiError::BadRequest(_))));
	}

	#[test]
	fn invalid_colour_is_rejected() {
		let mut query = raw();
		query.point_colour = Some("not-a-colour".to_string());
		assert!(matches!(parse_style(&query), Err(ApiError::BadRequest(_))));
	}

	#[test]
	fn missing_indexes_is_rejected() {
		assert!(matches!(parse_indexes_and_search(&raw()), Err(ApiError::BadRequest(_))));
	}

	#[test]
	fn comma_separated_indexes_are_split_and_trimmed() {
		let mut query = raw();
		query.indexes = Some(" a, b ,c".to_string());
		let (indexes, search) = parse_indexes_and_search(&query).unwrap();
		assert_eq!(indexes, vec!["a", "b", "c"]);
		assert!(search.is_none());
	}

	#[test]
	fn utfgrid_defaults_differ_by_style() {
		assert_eq!(utfgrid_defaults(&Style::Plot(PlotParams::default()), &raw()), (4, 3));
		assert_eq!(utfgrid_defaults(&Style::Gridded(GriddedParams::default()), &raw()), (8, 1));
	}
}
