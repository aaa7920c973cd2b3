//! Minimal JSON value/object/array types plus a hand-rolled parser and
//! stringifier. Used for the aggregation query sent to the index and for
//! the UTFGrid document returned to clients; we don't pull in `serde_json`
//! because every value we touch is either assembled by hand (the query) or
//! walked once into typed fields (the response) rather than round-tripped
//! through `Deserialize`.

mod parse;
mod stringify;
mod types;

pub use parse::parse_json_str;
pub use stringify::*;
pub use types::{AsNumber, JsonArray, JsonObject, JsonValue};
