use std::{io, path::PathBuf};

use bytes::Bytes;
use http::StatusCode;
use mount_helper_shared::CommandFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("failed connecting to {}: {source}", .path.display())]
	Connect {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("failed building request: {0}")]
	Request(#[from] http::Error),
	#[error("HTTP transport failed: {0}")]
	Http(#[from] hyper::Error),
	/// The helper ran the external command and it failed.
	#[error("command failed with {}: {}", .0.exit_code, .0.description)]
	CommandFailed(CommandFailure),
	#[error("request rejected with {status}: {body}")]
	Rejected {
		status: StatusCode,
		body: String,
	},
	#[error("unexpected response body: {0}")]
	ProtocolMismatch(#[from] serde_json::Error),
}

/// Passes through the body of a 200 response and turns anything else into an [`Error`].
pub fn decode_errors(status: StatusCode, body: Bytes) -> Result<Bytes, Error> {
	if status == StatusCode::OK {
		return Ok(body);
	}

	if status == StatusCode::INTERNAL_SERVER_ERROR {
		if let Ok(failure) = serde_json::from_slice(&body) {
			return Err(Error::CommandFailed(failure));
		}
	}

	Err(Error::Rejected {
		status,
		body: String::from_utf8_lossy(&body).into_owned(),
	})
}
