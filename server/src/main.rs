#![forbid(unsafe_code)]
#![deny(non_snake_case)]

use std::{future::{Future, IntoFuture}, sync::Arc};

use anyhow::Context;
use axum::Router;
use clap::Parser;
use tokio::net::UnixListener;
use tracing::{error, info};

mod config;
use config::Config;

mod error;
mod executor;
mod extractors;
mod routes;
mod socket;
mod testing;

use executor::SystemExecutor;
use extractors::AppState;
use socket::{shutdown_signal, SocketGuard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let config = Config::parse();
	config.init_tracing();
	
	info!(
		socket_path = %config.socket_path.display(),
		debug_log_path = %config.debug_log_path.display(),
		journal_unit = %config.journal_unit,
		"starting mount-helper-container service",
	);
	
	let app_state = AppState::new(Arc::new(SystemExecutor), config.debug_log_target());
	let app = routes::router(app_state);
	
	let (listener, socket_guard) = SocketGuard::bind(&config.socket_path)?;
	
	let served = serve(listener, app, shutdown_signal()).await;
	drop(socket_guard);
	
	// in-flight commands are abandoned, the runtime would otherwise wait for their blocking threads
	match served {
		Ok(()) => {
			info!("mount-helper-container service stopped");
			std::process::exit(0)
		},
		Err(err) => {
			error!(error = format!("{err:#}"), "mount-helper-container service failed");
			std::process::exit(1)
		},
	}
}

/// Serves `app` until `shutdown` resolves, without waiting for requests still in flight.
async fn serve(listener: UnixListener, app: Router, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
	tokio::select! {
		result = axum::serve(listener, app).into_future() => result.context("error while serving HTTP requests"),
		() = shutdown => Ok(()),
	}
}
