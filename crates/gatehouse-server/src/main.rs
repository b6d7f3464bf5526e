// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Gatehouse server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gatehouse_server::{create_app_state, create_router};
use gatehouse_server_config::LogFormat;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Gatehouse - grants GitHub repository access to members of a gating team.
#[derive(Parser, Debug)]
#[command(name = "gatehouse-server", about = "Gatehouse repository access server", version)]
struct Args {
	/// TOML config file. Defaults to /etc/gatehouse/server.toml.
	#[arg(long, env = "GATEHOUSE_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("gatehouse-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => gatehouse_server_config::load_config_with_file(path)?,
		None => gatehouse_server_config::load_config()?,
	};

	let json = config.logging.format == LogFormat::Json;
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.with((!json).then(|| tracing_subscriber::fmt::layer()))
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		target_repo = %config.gate.target,
		"starting gatehouse-server"
	);

	let state = create_app_state(&config)?;
	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
