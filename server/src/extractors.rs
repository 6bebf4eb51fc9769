use std::{convert::Infallible, path::Path, sync::Arc};

use axum::{body::Bytes, extract::{FromRequest, FromRequestParts, Request}, http::request::Parts};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{error::Error, executor::{CommandError, CommandExecutor}};

#[derive(Clone, Debug)]
pub struct AppState {
	executor: Executor,
	debug_logs: DebugLogTarget,
}

impl AppState {
	pub fn new(executor: Arc<dyn CommandExecutor>, debug_logs: DebugLogTarget) -> Self {
		Self {
			executor: Executor::new(executor),
			debug_logs,
		}
	}
}

#[derive(Clone, Debug)]
pub struct Executor(Arc<dyn CommandExecutor>);

impl Executor {
	pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
		Self(executor)
	}

	/// Runs `program` on the blocking pool, the calling task waits until it exits.
	pub async fn run(&self, program: &'static str, args: Vec<String>) -> Result<String, CommandError> {
		let executor = Arc::clone(&self.0);

		tokio::task::spawn_blocking(move || {
			executor.execute(program, &args) // may block indefinitely
		}).await.expect("command execution should not panic")
	}
}

impl FromRequestParts<AppState> for Executor {
	type Rejection = Infallible;

	async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		Ok(state.executor.clone())
	}
}

/// Where the debug-log endpoint reads logs from and writes them to.
#[derive(Clone, Debug)]
pub struct DebugLogTarget {
	pub path: Arc<Path>,
	pub journal_unit: Arc<str>,
}

impl FromRequestParts<AppState> for DebugLogTarget {
	type Rejection = Infallible;

	async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		Ok(state.debug_logs.clone())
	}
}

/// JSON request body.
///
/// Unlike [`axum::Json`] this ignores the `Content-Type` header and maps
/// every failure to [`Error::BadRequest`].
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
	S: Send + Sync,
	T: DeserializeOwned,
{
	type Rejection = Error;

	async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
		let bytes = Bytes::from_request(request, state).await
			.map_err(|err| {
				warn!(error = %err, "failed reading request body");
				Error::BadRequest
			})?;

		serde_json::from_slice(&bytes)
			.map(Self)
			.map_err(|err| {
				warn!(error = %err, "invalid request");
				Error::BadRequest
			})
	}
}
