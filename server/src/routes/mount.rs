use super::*;

/// Arguments for the mount program, in the order it expects them.
pub fn mount_args(request: &MountRequest) -> Vec<String> {
	vec![
		"-t".to_owned(),
		request.fs_type.clone(),
		"-o".to_owned(),
		"secure=true".to_owned(),
		request.source_path.clone(),
		request.target_path.clone(),
		"-v".to_owned(),
	]
}

pub async fn mount(executor: Executor, JsonBody(request): JsonBody<MountRequest>) -> Result<Json<MountReply>, Error> {
	let request_id = request.request_id.as_str();
	
	if request.source_path.is_empty() || request.target_path.is_empty() {
		warn!(request_id, "mount request is missing the source or target path");
		return Err(Error::BadRequest);
	}
	
	info!(
		request_id,
		source_path = %request.source_path,
		target_path = %request.target_path,
		fs_type = %request.fs_type,
		"new mount request",
	);
	
	let output = executor.run(MOUNT, mount_args(&request)).await
		.inspect_err(|err| error!(request_id, error = %err, output = err.output(), "mounting failed"))?;
	
	info!(request_id, %output, "mounted");
	
	Ok(Json(MountReply::default()))
}

pub async fn umount(executor: Executor, JsonBody(request): JsonBody<UnmountRequest>) -> Result<Json<Reply>, Error> {
	info!(target_path = %request.target_path, "new umount request");
	
	let output = executor.run(UMOUNT, vec![request.target_path.clone()]).await
		.inspect_err(|err| error!(target_path = %request.target_path, error = %err, output = err.output(), "umount failed"))?;
	
	info!(target_path = %request.target_path, %output, "unmounted");
	
	Ok(Json(Reply::processed()))
}
