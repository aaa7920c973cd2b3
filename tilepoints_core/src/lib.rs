//! Shared primitives used across the tilepoints workspace: tile geometry and
//! web-mercator projection, the core error enum, and a minimal JSON value
//! type used for building backing-store queries and UTFGrid documents.

pub mod error;
pub mod json;
pub mod tile;

pub use error::CoreError;
pub use tile::{Tile, clamp, is_power_of_two, lat_lon_clamp, lat_to_y, lon_to_x, precision_for_zoom, translate, wrap_longitude};
