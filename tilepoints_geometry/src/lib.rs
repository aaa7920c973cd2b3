//! Spatial types and transforms sitting between the raw aggregation response
//! from the backing store and the renderers in `tilepoints_image`: geohash
//! decoding, the `Bucket` type, grid-cell grouping, record rebuilding, and
//! the UTFGrid 1.3 encoder.

pub mod bucket;
pub mod geohash;
pub mod grouping;
pub mod rebuild;
pub mod utfgrid;

pub use bucket::{BBox, Bucket};
pub use geohash::GeohashBox;
pub use grouping::{GridCell, group_into_cells};
pub use rebuild::rebuild;
pub use utfgrid::{UtfGrid, encode_gridded, encode_plot};
