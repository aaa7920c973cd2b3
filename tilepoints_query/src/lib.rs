//! Talks to the backing geo-index aggregation store: builds the
//! geohash-grid search request, issues it over HTTP, and parses the
//! response into ordered `Bucket`s. Also decodes the `query` HTTP knob
//! (a compressed, base64-encoded index/search document).

pub mod body;
pub mod client;
pub mod decode;

pub use body::{build_query_body, parse_response};
pub use client::QueryClient;
pub use decode::{DecodedQuery, decode_query_param};
