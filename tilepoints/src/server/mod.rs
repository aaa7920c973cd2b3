//! HTTP server composition and lifecycle: route/middleware wiring lives in
//! `routes`, request handling in `handlers`/`full`/`params`, error mapping
//! in `error`, CORS in `cors`, and shared request-parallel state in
//! `state`. This module owns startup/shutdown only, kept separate from
//! routing concerns.

mod cors;
mod error;
mod full;
mod handlers;
mod params;
mod routes;
mod state;

pub use routes::build_router;
pub use state::AppState;

use crate::cli::ServeArgs;
use crate::config::Config;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tilepoints_image::ImageCaches;
use tilepoints_query::QueryClient;
use tokio::net::TcpListener;

/// Load configuration, build the query client and image caches, bind a
/// listener, and serve until a shutdown signal arrives.
#[tokio::main]
pub async fn run(arguments: &ServeArgs) -> Result<()> {
	let mut config = Config::resolve(arguments.config.as_deref())?;
	config.server.override_optional_ip(&arguments.ip);
	config.server.override_optional_port(&arguments.port);

	if config.backing_store.sniff_on_start {
		sniff_hosts(&config.backing_store.hosts, Duration::from_secs(config.backing_store.sniff_timeout_secs)).await;
	}

	let request_timeout = Duration::from_secs(config.backing_store.timeout_secs);

	let query_client = QueryClient::new(config.backing_store.hosts.clone(), request_timeout)?;
	let state = AppState {
		query_client: Arc::new(query_client),
		caches: Arc::new(ImageCaches::new()),
		background_client: Arc::new(reqwest::Client::new()),
		request_timeout,
	};

	let router = build_router(state, &config.server.cors, request_timeout)?;

	let ip = config.server.ip.clone().unwrap_or_else(|| "0.0.0.0".to_string());
	let port = config.server.port.unwrap_or(5000);
	let addr = format!("{ip}:{port}");

	log::info!("serving tiles on {addr}, backing store: {:?}", config.backing_store.hosts);

	let listener = TcpListener::bind(&addr).await?;
	axum::serve(listener, router.into_make_service())
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	log::info!("server shut down");
	Ok(())
}

/// Probe every configured host once, logging reachability. Non-fatal:
/// an unreachable host at startup doesn't stop the server, since the
/// backing store may come up after us.
async fn sniff_hosts(hosts: &[String], timeout: Duration) {
	let client = match reqwest::Client::builder().timeout(timeout).build() {
		Ok(client) => client,
		Err(err) => {
			log::warn!("could not build sniffing client: {err}");
			return;
		}
	};

	for host in hosts {
		match client.get(host).send().await {
			Ok(response) => log::info!("backing store host {host} reachable (status {})", response.status()),
			Err(err) => log::warn!("backing store host {host} not reachable at startup: {err}"),
		}
	}
}

/// Waits for either ctrl-c or, on unix, SIGTERM.
async fn shutdown_signal() {
	let ctrl_c = async {
		tokio::signal::ctrl_c().await.expect("failed to install ctrl-c handler");
	};

	#[cfg(unix)]
	let terminate = async {
		tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
			.expect("failed to install SIGTERM handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => log::info!("received ctrl-c, shutting down"),
		() = terminate => log::info!("received SIGTERM, shutting down"),
	}
}
