use std::path::Path;

use axum::{http::StatusCode, routing::{get, post}, Json, Router};
use mount_helper_client::{Error, MountHelperClient};
use mount_helper_shared::{CommandFailure, DebugLogRequest, InvalidRequest, MountReply, MountRequest, Reply, StatusRequest, UnmountRequest, STATUS_SUCCESS};
use tempfile::TempDir;
use tokio::net::UnixListener;

async fn mount(Json(request): Json<MountRequest>) -> Result<Json<MountReply>, StatusCode> {
	match request.source_path.as_str() {
		"/src" => Ok(Json(MountReply::default())),
		_ => Err(StatusCode::BAD_REQUEST),
	}
}

async fn umount(Json(request): Json<UnmountRequest>) -> (StatusCode, Json<CommandFailure>) {
	(StatusCode::INTERNAL_SERVER_ERROR, Json(CommandFailure {
		exit_code: "exit status: 32".to_owned(),
		description: format!("umount: {}: not mounted.\n", request.target_path),
	}))
}

async fn mount_status(Json(_request): Json<StatusRequest>) -> Json<&'static str> {
	Json(STATUS_SUCCESS)
}

async fn liveness() -> Json<Reply> {
	Json(Reply::live())
}

async fn debug_logs(Json(_request): Json<DebugLogRequest>) -> (StatusCode, Json<InvalidRequest>) {
	(StatusCode::BAD_REQUEST, Json(InvalidRequest::default()))
}

async fn serve(socket_path: &Path) {
	let app = Router::new()
		.route("/api/mount", post(mount))
		.route("/api/umount", post(umount))
		.route("/api/mountStatus", get(mount_status))
		.route("/api/mountHelperContainerStatus", get(liveness))
		.route("/api/debugLogs", post(debug_logs));

	let listener = UnixListener::bind(socket_path).unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
}

async fn setup() -> (TempDir, MountHelperClient) {
	let temp_dir = tempfile::tempdir().unwrap();
	let socket_path = temp_dir.path().join("ibmshare.sock");
	serve(&socket_path).await;

	(temp_dir, MountHelperClient::new(socket_path))
}

#[tokio::test]
async fn mount_success() {
	let (_temp_dir, client) = setup().await;

	let reply = client.mount(&MountRequest {
		source_path: "/src".to_owned(),
		target_path: "/dst".to_owned(),
		fs_type: "ibmshare".to_owned(),
		request_id: "1".to_owned(),
	}).await.unwrap();

	assert_eq!(reply, MountReply::default());
}

#[tokio::test]
async fn mount_rejected() {
	let (_temp_dir, client) = setup().await;

	let err = client.mount(&MountRequest {
		source_path: "/elsewhere".to_owned(),
		target_path: "/dst".to_owned(),
		fs_type: "ibmshare".to_owned(),
		request_id: "1".to_owned(),
	}).await.unwrap_err();

	let Error::Rejected { status, .. } = err else {panic!()};
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn umount_failure() {
	let (_temp_dir, client) = setup().await;

	let Err(Error::CommandFailed(failure)) = client.umount("/dst").await else {panic!()};
	assert_eq!(failure.exit_code, "exit status: 32");
	assert_eq!(failure.description, "umount: /dst: not mounted.\n");
}

#[tokio::test]
async fn status_and_liveness() {
	let (_temp_dir, client) = setup().await;

	assert_eq!(client.mount_status("/dst").await.unwrap(), STATUS_SUCCESS);
	assert_eq!(client.is_live().await.unwrap(), Reply::live());
}

#[tokio::test]
async fn debug_logs_bad_request() {
	let (_temp_dir, client) = setup().await;

	let err = client.collect_debug_logs("42").await.unwrap_err();
	let Error::Rejected { status, body } = err else {panic!()};
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body, r#"{"error":"Invalid request"}"#);
}

#[tokio::test]
async fn missing_socket() {
	let temp_dir = tempfile::tempdir().unwrap();
	let client = MountHelperClient::new(temp_dir.path().join("missing.sock"));

	let err = client.is_live().await.unwrap_err();
	let Error::Connect { path, source } = err else {panic!()};
	assert_eq!(path, temp_dir.path().join("missing.sock"));
	assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
}
