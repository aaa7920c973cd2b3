//! Shared, request-parallel state: the backing-store client and the two
//! rendering caches. Both are held behind `Arc` so every tokio worker
//! thread shares one copy.

use std::sync::Arc;
use std::time::Duration;
use tilepoints_image::ImageCaches;
use tilepoints_query::QueryClient;

#[derive(Clone)]
pub struct AppState {
	pub query_client: Arc<QueryClient>,
	pub caches: Arc<ImageCaches>,
	/// A plain client for fetching OSM background raster tiles for
	/// `/full.png?with_background=true`. Kept separate from `query_client`
	/// since it talks to an entirely different upstream with no search body.
	pub background_client: Arc<reqwest::Client>,
	/// The backing-store deadline, reused as the outer per-request timeout
	/// in the router's middleware stack.
	pub request_timeout: Duration,
}
