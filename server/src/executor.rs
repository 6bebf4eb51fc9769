use std::{fmt::Debug, io, process::{Command, Stdio}};

use thiserror::Error;
use tracing::debug;

/// Runs an external program and reports its combined output.
///
/// Implementations receive the argument vector as-is; nothing is ever
/// interpreted by a shell.
pub trait CommandExecutor: Debug + Send + Sync {
	fn execute(&self, program: &str, args: &[String]) -> Result<String, CommandError>;
}

#[derive(Error, Debug)]
pub enum CommandError {
	/// The program ran but did not exit successfully.
	#[error("{status}")]
	Exited {
		status: String,
		output: String,
	},
	#[error("failed to start {program}: {source}")]
	Spawn {
		program: String,
		#[source]
		source: io::Error,
	},
}

impl CommandError {
	pub fn exited(status: impl Into<String>, output: impl Into<String>) -> Self {
		Self::Exited {
			status: status.into(),
			output: output.into(),
		}
	}

	/// Everything the program wrote before failing, empty if it never started.
	pub fn output(&self) -> &str {
		match self {
			Self::Exited { output, .. } => output,
			Self::Spawn { .. } => "",
		}
	}
}

#[derive(Clone, Copy, Default, Debug)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
	fn execute(&self, program: &str, args: &[String]) -> Result<String, CommandError> {
		debug!(program, ?args, "spawning command");

		let output = Command::new(program)
			.args(args)
			.stdin(Stdio::null())
			.output()
			.map_err(|source| CommandError::Spawn {
				program: program.to_owned(),
				source,
			})?;

		let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
		combined.push_str(&String::from_utf8_lossy(&output.stderr));

		if output.status.success() {
			Ok(combined)
		} else {
			Err(CommandError::exited(output.status.to_string(), combined))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn args(args: &[&str]) -> Vec<String> {
		args.iter().map(|arg| arg.to_string()).collect()
	}

	#[test]
	fn combines_stdout_and_stderr() {
		let output = SystemExecutor.execute("sh", &args(&["-c", "printf out; printf err >&2"])).unwrap();
		assert_eq!(output, "outerr");
	}

	#[test]
	fn non_zero_exit() {
		let err = SystemExecutor.execute("sh", &args(&["-c", "printf 'not mounted'; exit 32"])).unwrap_err();
		assert!(matches!(err, CommandError::Exited { .. }));
		assert_eq!(err.to_string(), "exit status: 32");
		assert_eq!(err.output(), "not mounted");
	}

	#[test]
	fn arguments_are_not_shell_expanded() {
		let output = SystemExecutor.execute("printf", &args(&["%s", "$(echo injected); rm -rf /tmp/x"])).unwrap();
		assert_eq!(output, "$(echo injected); rm -rf /tmp/x");
	}

	#[test]
	fn missing_program() {
		let err = SystemExecutor.execute("/nonexistent/mount-helper-test-binary", &[]).unwrap_err();
		let CommandError::Spawn { program, source } = &err else {panic!()};
		assert_eq!(program, "/nonexistent/mount-helper-test-binary");
		assert_eq!(source.kind(), io::ErrorKind::NotFound);
		assert_eq!(err.output(), "");
	}
}
