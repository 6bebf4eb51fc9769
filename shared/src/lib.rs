#![forbid(unsafe_code)]
#![deny(non_snake_case)]

use std::fmt::Display;

use http::Method;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOCKET_PATH: &str = "/var/lib/ibmshare.sock";

pub const PROCESSED_MESSAGE: &str = "Request processed successfully";
pub const LIVE_MESSAGE: &str = "Mount-helper-container server is live!";
pub const STATUS_SUCCESS: &str = "Success!!";
pub const INVALID_REQUEST: &str = "Invalid request";

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Endpoint {
	Mount,
	Umount,
	MountStatus,
	Liveness,
	DebugLogs,
}

impl Endpoint {
	pub const ALL: [Endpoint; 5] = [
		Endpoint::Mount,
		Endpoint::Umount,
		Endpoint::MountStatus,
		Endpoint::Liveness,
		Endpoint::DebugLogs,
	];

	pub fn path(self) -> &'static str {
		match self {
			Self::Mount => "/api/mount",
			Self::Umount => "/api/umount",
			Self::MountStatus => "/api/mountStatus",
			Self::Liveness => "/api/mountHelperContainerStatus",
			Self::DebugLogs => "/api/debugLogs",
		}
	}

	pub fn method(self) -> Method {
		match self {
			Self::Mount | Self::Umount | Self::DebugLogs => Method::POST,
			Self::MountStatus | Self::Liveness => Method::GET,
		}
	}

	/// Whether requests to this endpoint carry a JSON body.
	pub fn has_body(self) -> bool {
		!matches!(self, Self::Liveness)
	}
}

impl Display for Endpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.method(), self.path())
	}
}

/// Attaches `source_path` at `target_path` using the `fs_type` filesystem.
///
/// The source is sent as `mountPath`; older callers use `sourcePath` or
/// `stagingTargetPath`, which are accepted as well.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct MountRequest {
	#[serde(rename = "mountPath", alias = "sourcePath", alias = "stagingTargetPath")]
	pub source_path: String,
	#[serde(rename = "targetPath")]
	pub target_path: String,
	#[serde(rename = "fsType")]
	pub fs_type: String,
	#[serde(rename = "requestID", default)]
	pub request_id: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct UnmountRequest {
	#[serde(rename = "targetPath")]
	pub target_path: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct StatusRequest {
	#[serde(rename = "targetPath")]
	pub target_path: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct DebugLogRequest {
	#[serde(rename = "requestID", default)]
	pub request_id: String,
}

/// Success body of the mount endpoint, the only one using a lowercase key.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct MountReply {
	pub message: String,
}

impl Default for MountReply {
	fn default() -> Self {
		Self {
			message: PROCESSED_MESSAGE.to_owned(),
		}
	}
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Reply {
	#[serde(rename = "Message")]
	pub message: String,
}

impl Reply {
	pub fn processed() -> Self {
		Self {
			message: PROCESSED_MESSAGE.to_owned(),
		}
	}

	pub fn live() -> Self {
		Self {
			message: LIVE_MESSAGE.to_owned(),
		}
	}
}

/// Body of a 500 response: the error reported for the external command
/// and everything it wrote to stdout and stderr.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CommandFailure {
	#[serde(rename = "MountExitCode")]
	pub exit_code: String,
	#[serde(rename = "Description")]
	pub description: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct InvalidRequest {
	pub error: String,
}

impl Default for InvalidRequest {
	fn default() -> Self {
		Self {
			error: INVALID_REQUEST.to_owned(),
		}
	}
}
