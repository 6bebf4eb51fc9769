use std::{fmt::{Debug, Display, Formatter}, io, path::Path, sync::Arc};

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use mount_helper_shared::{CommandFailure, InvalidRequest};

use crate::executor::CommandError;

#[derive(Debug)]
pub enum Error {
	/// The body did not decode into the request type of the endpoint.
	BadRequest,
	CommandFailed(CommandError),
	Io {
		path: Arc<Path>,
		source: io::Error,
	},
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::BadRequest => f.write_str("invalid request"),
			Self::CommandFailed(err) => write!(f, "command failed: {err}"),
			Self::Io { path, source } => write!(f, "failed writing {}: {source}", path.display()),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::BadRequest => None,
			Self::CommandFailed(err) => Some(err),
			Self::Io { source, .. } => Some(source),
		}
	}
}

impl From<CommandError> for Error {
	fn from(value: CommandError) -> Self {
		Self::CommandFailed(value)
	}
}

impl Error {
	pub fn io(path: Arc<Path>, source: io::Error) -> Self {
		Self::Io {
			path,
			source,
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Self::BadRequest => StatusCode::BAD_REQUEST,
			Self::CommandFailed(_) | Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();

		match self {
			Error::BadRequest => (status, Json(InvalidRequest::default())).into_response(),
			// error text and output are forwarded verbatim so the caller can report them upstream
			Error::CommandFailed(err) => (status, Json(CommandFailure {
				exit_code: err.to_string(),
				description: err.output().to_owned(),
			})).into_response(),
			Error::Io { path, source } => (status, Json(CommandFailure {
				exit_code: source.to_string(),
				description: path.display().to_string(),
			})).into_response(),
		}
	}
}
