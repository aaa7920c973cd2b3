//! HTTP client for the backing geo-index aggregation store.
//!
//! A `reqwest::Client` built once and held behind `&self`, with
//! `#[context(...)]` wrapping the fallible call for a consistent error
//! trail. This client issues one JSON search request per tile and parses
//! a JSON response rather than raw bytes, so there's no
//! `Regex`/`lazy_static` content-range parsing here.

use crate::body::{build_query_body, parse_response};
use anyhow::{Result, anyhow};
use reqwest::Client;
use std::time::Duration;
use tilepoints_core::json::{JsonObject, JsonValue};
use tilepoints_core::{CoreError, Tile};
use tilepoints_derive::context;
use tilepoints_geometry::Bucket;

/// Talks to the geo-index aggregation store that backs every tile request.
#[derive(Debug, Clone)]
pub struct QueryClient {
	client: Client,
	hosts: Vec<String>,
	timeout: Duration,
}

impl QueryClient {
	/// Build a client against `hosts` (the first reachable entry is used;
	/// the backing store's own sniffing/failover is out of scope here —
	/// see `DESIGN.md`), applying `timeout` as the per-request deadline.
	///
	/// # Errors
	/// Returns an error if `hosts` is empty or the underlying HTTP client
	/// cannot be constructed.
	pub fn new(hosts: Vec<String>, timeout: Duration) -> Result<Self> {
		if hosts.is_empty() {
			return Err(anyhow!("at least one backing-store host is required"));
		}
		let client = Client::builder().tcp_keepalive(Duration::from_secs(600)).build()?;
		Ok(QueryClient { client, hosts, timeout })
	}

	/// Run the geohash-grid aggregation for `tile` over `indexes`,
	/// optionally AND-composing `search` with the tile's geo filter, and
	/// return the resulting buckets in descending-count order.
	///
	/// Every failure path here is a `CoreError` (`UpstreamUnavailable`,
	/// `UpstreamTimeout`, `UpstreamMalformed`) carried inside the returned
	/// `anyhow::Error`; the HTTP layer downcasts it back to pick a status
	/// code.
	///
	/// # Errors
	/// See above.
	#[context("querying backing store for tile z={} x={} y={}", tile.z, tile.x, tile.y)]
	pub async fn query(&self, tile: &Tile, indexes: &[String], search: Option<&JsonObject>) -> Result<Vec<Bucket>> {
		let body = build_query_body(tile, search);
		let url = format!("{}/{}/_search", self.hosts[0].trim_end_matches('/'), indexes.join(","));

		let response = self
			.client
			.post(&url)
			.timeout(self.timeout)
			.header("content-type", "application/json")
			.body(body.stringify())
			.send()
			.await
			.map_err(|error| {
				if error.is_timeout() {
					CoreError::UpstreamTimeout
				} else {
					CoreError::UpstreamUnavailable(error.to_string())
				}
			})?;

		if !response.status().is_success() {
			let status = response.status();
			return Err(CoreError::UpstreamUnavailable(format!("backing store responded with {status}")).into());
		}

		let text = response
			.text()
			.await
			.map_err(|error| CoreError::UpstreamMalformed(error.to_string()))?;
		let parsed = JsonValue::parse_str(&text).map_err(|error| CoreError::UpstreamMalformed(error.to_string()))?;

		Ok(parse_response(&parsed)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{method, path_regex};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn tile() -> Tile {
		Tile::with_default_size(6, 20, 20)
	}

	#[test]
	fn rejects_an_empty_host_list() {
		assert!(QueryClient::new(Vec::new(), Duration::from_secs(1)).is_err());
	}

	#[tokio::test]
	async fn a_successful_response_is_parsed_into_buckets() {
		let server = MockServer::start().await;
		let body = r#"{"aggregations":{"grid":{"buckets":[
			{"key":"u0mwd","doc_count":7,"first":{"hits":{"hits":[{"_source":{}}]}}}
		]}}}"#;
		Mock::given(method("POST"))
			.and(path_regex(r"^/my_index/_search$"))
			.respond_with(ResponseTemplate::new(200).set_body_string(body))
			.mount(&server)
			.await;

		let client = QueryClient::new(vec![server.uri()], Duration::from_secs(5)).unwrap();
		let buckets = client.query(&tile(), &["my_index".to_string()], None).await.unwrap();
		assert_eq!(buckets.len(), 1);
		assert_eq!(buckets[0].total, 7);
	}

	#[tokio::test]
	async fn a_non_success_status_is_upstream_unavailable() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path_regex(r"^/my_index/_search$"))
			.respond_with(ResponseTemplate::new(500))
			.mount(&server)
			.await;

		let client = QueryClient::new(vec![server.uri()], Duration::from_secs(5)).unwrap();
		let error = client.query(&tile(), &["my_index".to_string()], None).await.unwrap_err();
		assert!(matches!(error.downcast_ref::<CoreError>(), Some(CoreError::UpstreamUnavailable(_))));
	}

	#[tokio::test]
	async fn a_malformed_body_is_upstream_malformed() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path_regex(r"^/my_index/_search$"))
			.respond_with(ResponseTemplate::new(200).set_body_string("not json"))
			.mount(&server)
			.await;

		let client = QueryClient::new(vec![server.uri()], Duration::from_secs(5)).unwrap();
		let error = client.query(&tile(), &["my_index".to_string()], None).await.unwrap_err();
		assert!(matches!(error.downcast_ref::<CoreError>(), Some(CoreError::UpstreamMalformed(_))));
	}
}
