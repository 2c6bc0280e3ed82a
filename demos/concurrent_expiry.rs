//! Fires a burst of requests at an API whose session cookie just expired and shows the gateway
//! refreshing once before replaying every request.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use session_gateway::{
	config::GatewayConfig, gateway::ReqwestGateway, http::OutboundRequest,
	session::SessionExpiredEvent,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/playlist/").header_missing("cookie");
			then.status(401).body("{\"message\":\"session expired\"}");
		})
		.await;
	let _refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/refreshToken");
			then.status(200)
				.header("set-cookie", "session=demo-fresh; Path=/")
				.delay(std::time::Duration::from_millis(50))
				.body("{\"success\":true}");
		})
		.await;
	let _fresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/playlist/").header("cookie", "session=demo-fresh");
			then.status(200).header("content-type", "application/json").body("{\"playlists\":[]}");
		})
		.await;
	let config = GatewayConfig::builder(Url::parse(&server.url("/api/v1"))?).build()?;
	let gateway = Arc::new(ReqwestGateway::new(config)?.with_listener(
		|event: &SessionExpiredEvent| {
			println!("Session expired ({}), sending the user to {}.", event.reason, event.login_path);
		},
	));
	let handles = (1..=5)
		.map(|n| {
			let gateway = gateway.clone();

			tokio::spawn(async move {
				let request = OutboundRequest::get("/playlist/").with_query("caller", n.to_string());

				(n, gateway.execute(request).await)
			})
		})
		.collect::<Vec<_>>();

	for handle in handles {
		let (n, result) = handle.await?;
		let response = result?;

		println!("Caller {n} finished with HTTP {}: {}.", response.status, response.text());
	}

	let metrics = gateway.metrics();

	println!(
		"Refresh calls: {}, queued callers: {}, replays: {}.",
		metrics.refresh_calls(),
		metrics.queued(),
		metrics.replay_successes()
	);

	Ok(())
}
