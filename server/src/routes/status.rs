use super::*;

pub async fn mount_status(executor: Executor, JsonBody(request): JsonBody<StatusRequest>) -> Result<Json<&'static str>, Error> {
	debug!(target_path = %request.target_path, "mount status request");
	
	executor.run(FINDMNT, vec![request.target_path.clone()]).await
		.inspect_err(|err| error!(target_path = %request.target_path, error = %err, output = err.output(), "find mount failed"))?;
	
	Ok(Json(STATUS_SUCCESS))
}

pub async fn liveness() -> Json<Reply> {
	Json(Reply::live())
}
