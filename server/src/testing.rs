#![cfg(test)]

use std::{future::IntoFuture, io, path::{Path, PathBuf}, sync::{Arc, Mutex}, time::Duration};

use axum::{body::{self, Body}, http::{Method, Request, StatusCode}};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::UnixListener;
use tower::ServiceExt;

use crate::{executor::{CommandError, CommandExecutor}, extractors::{AppState, DebugLogTarget, Executor}, routes::router};

pub const TEST_JOURNAL_UNIT: &str = "mount-helper-test";

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Invocation {
	pub program: String,
	pub args: Vec<String>,
}

impl Invocation {
	pub fn new(program: &str, args: &[&str]) -> Self {
		Self {
			program: program.to_owned(),
			args: args.iter().map(|arg| arg.to_string()).collect(),
		}
	}

	pub fn argv(&self) -> Vec<&str> {
		std::iter::once(self.program.as_str())
			.chain(self.args.iter().map(String::as_str))
			.collect()
	}
}

#[derive(Clone, Debug)]
enum Outcome {
	Success(String),
	Failure {
		status: String,
		output: String,
	},
	Unspawnable,
}

/// Executor answering every command with the same scripted outcome.
#[derive(Debug)]
pub struct FakeExecutor {
	outcome: Outcome,
	delay: Duration,
	invocations: Mutex<Vec<Invocation>>,
}

impl FakeExecutor {
	fn with_outcome(outcome: Outcome) -> Arc<Self> {
		Arc::new(Self {
			outcome,
			delay: Duration::ZERO,
			invocations: Mutex::new(Vec::new()),
		})
	}

	pub fn succeeding(output: &str) -> Arc<Self> {
		Self::with_outcome(Outcome::Success(output.to_owned()))
	}

	pub fn failing(status: &str, output: &str) -> Arc<Self> {
		Self::with_outcome(Outcome::Failure {
			status: status.to_owned(),
			output: output.to_owned(),
		})
	}

	/// Succeeds with `output` after blocking the calling thread for `delay`.
	pub fn succeeding_after(output: &str, delay: Duration) -> Arc<Self> {
		Arc::new(Self {
			outcome: Outcome::Success(output.to_owned()),
			delay,
			invocations: Mutex::new(Vec::new()),
		})
	}

	/// Fails every command as if the program didn't exist.
	pub fn unspawnable() -> Arc<Self> {
		Self::with_outcome(Outcome::Unspawnable)
	}

	pub fn invocations(&self) -> Vec<Invocation> {
		self.invocations.lock().unwrap().clone()
	}

	pub fn call_count(&self) -> usize {
		self.invocations.lock().unwrap().len()
	}
}

impl CommandExecutor for FakeExecutor {
	fn execute(&self, program: &str, args: &[String]) -> Result<String, CommandError> {
		self.invocations.lock().unwrap().push(Invocation {
			program: program.to_owned(),
			args: args.to_vec(),
		});

		std::thread::sleep(self.delay);

		match &self.outcome {
			Outcome::Success(output) => Ok(output.clone()),
			Outcome::Failure { status, output } => Err(CommandError::exited(status.as_str(), output.as_str())),
			Outcome::Unspawnable => Err(CommandError::Spawn {
				program: program.to_owned(),
				source: io::Error::from(io::ErrorKind::NotFound),
			}),
		}
	}
}

/// Router state backed by a [`FakeExecutor`] and a temporary debug-log file.
pub struct TestGateway {
	temp_dir: Option<TempDir>,
	pub executor: Arc<FakeExecutor>,
	debug_logs: DebugLogTarget,
}

impl TestGateway {
	pub fn new(executor: Arc<FakeExecutor>) -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let debug_logs = DebugLogTarget {
			path: temp_dir.path().join("debug.log").into(),
			journal_unit: TEST_JOURNAL_UNIT.into(),
		};

		Self {
			temp_dir: Some(temp_dir),
			executor,
			debug_logs,
		}
	}

	pub fn state(&self) -> AppState {
		AppState::new(self.executor.clone(), self.debug_logs.clone())
	}

	pub fn executor_handle(&self) -> Executor {
		Executor::new(self.executor.clone())
	}

	pub fn debug_log_target(&self) -> DebugLogTarget {
		self.debug_logs.clone()
	}

	pub fn log_path(&self) -> &Path {
		&self.debug_logs.path
	}

	pub fn temp_path(&self) -> PathBuf {
		self.temp_dir.as_ref().expect("should only be taken during drop").path().to_owned()
	}

	/// Sends one request through the full router and decodes the JSON response body.
	pub async fn send(&self, method: Method, path: &str, body: &str) -> (StatusCode, Value) {
		let request = Request::builder()
			.method(method)
			.uri(path)
			.body(Body::from(body.to_owned()))
			.unwrap();

		let response = router(self.state()).oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

		let value = match bytes.is_empty() {
			true => Value::Null,
			false => serde_json::from_slice(&bytes).unwrap(),
		};

		(status, value)
	}

	/// Serves the router on a unix socket inside the temp directory and returns its path.
	pub fn serve(&self) -> PathBuf {
		let socket_path = self.temp_path().join("gateway.sock");
		let listener = UnixListener::bind(&socket_path).unwrap();

		tokio::spawn(axum::serve(listener, router(self.state())).into_future());

		socket_path
	}
}

impl Drop for TestGateway {
	fn drop(&mut self) {
		if std::thread::panicking() {
			let path = self.temp_dir.take().expect("should only be taken during drop")
				.into_path();

			eprintln!("Panicked with active temp directory: {}", path.to_string_lossy());
		}
	}
}
