use super::*;

pub fn journal_args(unit: &str) -> Vec<String> {
	vec!["-u".to_owned(), unit.to_owned(), "--no-pager".to_owned()]
}

/// Dumps the service journal into the debug-log file, replacing its content.
///
/// Concurrent requests race on the file, the last writer wins.
pub async fn debug_logs(
	executor: Executor,
	target: DebugLogTarget,
	JsonBody(request): JsonBody<DebugLogRequest>,
) -> Result<Json<Reply>, Error> {
	let request_id = request.request_id.as_str();
	info!(request_id, journal_unit = %target.journal_unit, "collecting debug logs");
	
	let logs = executor.run(JOURNALCTL, journal_args(&target.journal_unit)).await
		.inspect_err(|err| error!(request_id, error = %err, output = err.output(), "log collection failed"))?;
	
	fs::write(&target.path, logs).await
		.map_err(|err| Error::io(target.path.clone(), err))
		.inspect_err(|err| error!(request_id, error = %err, "failed writing debug logs"))?;
	
	info!(request_id, path = %target.path.display(), "debug logs written");
	
	Ok(Json(Reply::processed()))
}
