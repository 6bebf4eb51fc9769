mod mount;
mod status;
mod debug_logs;

pub use mount::*;
pub use status::*;
pub use debug_logs::*;

use axum::{extract::Request, http::StatusCode, middleware::{self, Next}, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use mount_helper_shared::{DebugLogRequest, Endpoint, MountReply, MountRequest, Reply, StatusRequest, UnmountRequest, STATUS_SUCCESS};
use tokio::fs;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::{error::Error, extractors::*};

const MOUNT: &str = "mount";
const UMOUNT: &str = "umount";
const FINDMNT: &str = "findmnt";
const JOURNALCTL: &str = "journalctl";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route(Endpoint::Mount.path(), post(mount))
		.route(Endpoint::Umount.path(), post(umount))
		.route(Endpoint::MountStatus.path(), get(mount_status))
		.route(Endpoint::Liveness.path(), get(liveness))
		.route(Endpoint::DebugLogs.path(), post(debug_logs))
		.layer(middleware::from_fn(detach_from_connection))
		.layer(TraceLayer::new_for_http())
		.layer(CatchPanicLayer::new())
		.with_state(state)
}

/// Runs the rest of the request on its own task.
///
/// hyper drops the response future when the caller disconnects. Handlers
/// started here keep running until their command has finished and its
/// result (a mount, the debug-log file) has been applied.
async fn detach_from_connection(request: Request, next: Next) -> Response {
	match tokio::spawn(next.run(request)).await {
		Ok(response) => response,
		Err(err) => match err.try_into_panic() {
			// rethrown so CatchPanicLayer still turns it into a 500
			Ok(payload) => std::panic::resume_unwind(payload),
			Err(err) => {
				error!(error = %err, "request task was cancelled");
				StatusCode::INTERNAL_SERVER_ERROR.into_response()
			},
		},
	}
}
