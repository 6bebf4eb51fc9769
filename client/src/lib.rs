#![forbid(unsafe_code)]
#![deny(non_snake_case)]

use std::path::{Path, PathBuf};

use bytes::Bytes;
use http::{header, Request};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use mount_helper_shared::{DebugLogRequest, Endpoint, MountReply, MountRequest, Reply, StatusRequest, UnmountRequest};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::UnixStream;
use tracing::{debug, warn};

mod error;
pub use error::*;

/// Caller side of the mount helper socket.
///
/// Every call opens its own connection and sends exactly one request.
/// Failed requests are not retried.
#[derive(Clone, Debug)]
pub struct MountHelperClient {
	socket_path: PathBuf,
}

impl MountHelperClient {
	pub fn new(socket_path: impl Into<PathBuf>) -> Self {
		Self {
			socket_path: socket_path.into(),
		}
	}

	pub fn socket_path(&self) -> &Path {
		&self.socket_path
	}

	pub async fn mount(&self, request: &MountRequest) -> Result<MountReply, Error> {
		self.send_json(Endpoint::Mount, request).await
	}

	pub async fn umount(&self, target_path: &str) -> Result<Reply, Error> {
		let request = UnmountRequest {
			target_path: target_path.to_owned(),
		};

		self.send_json(Endpoint::Umount, &request).await
	}

	/// Succeeds if `target_path` is currently a mount point.
	pub async fn mount_status(&self, target_path: &str) -> Result<String, Error> {
		let request = StatusRequest {
			target_path: target_path.to_owned(),
		};

		self.send_json(Endpoint::MountStatus, &request).await
	}

	pub async fn is_live(&self) -> Result<Reply, Error> {
		let body = self.send(Endpoint::Liveness, Bytes::new()).await?;

		Ok(serde_json::from_slice(&body)?)
	}

	pub async fn collect_debug_logs(&self, request_id: &str) -> Result<Reply, Error> {
		let request = DebugLogRequest {
			request_id: request_id.to_owned(),
		};

		self.send_json(Endpoint::DebugLogs, &request).await
	}

	async fn send_json<B: Serialize, R: DeserializeOwned>(&self, endpoint: Endpoint, body: &B) -> Result<R, Error> {
		let body = serde_json::to_vec(body)?;
		let response = self.send(endpoint, body.into()).await?;

		Ok(serde_json::from_slice(&response)?)
	}

	async fn send(&self, endpoint: Endpoint, body: Bytes) -> Result<Bytes, Error> {
		let stream = UnixStream::connect(&self.socket_path).await
			.map_err(|source| Error::Connect {
				path: self.socket_path.clone(),
				source,
			})?;

		let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
		tokio::spawn(async move {
			if let Err(err) = connection.await {
				warn!(error = %err, "connection to mount helper failed");
			}
		});

		let request = Request::builder()
			.method(endpoint.method())
			.uri(endpoint.path())
			// the host is ignored on a unix socket but HTTP/1.1 requires one
			.header(header::HOST, "localhost")
			.header(header::CONTENT_TYPE, "application/json")
			.body(Full::new(body))?;

		debug!(%endpoint, "sending request");
		let response = sender.send_request(request).await?;
		let status = response.status();
		let body = response.into_body().collect().await?.to_bytes();
		debug!(%endpoint, %status, "received response");

		decode_errors(status, body)
	}
}
