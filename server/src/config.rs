use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mount_helper_shared::DEFAULT_SOCKET_PATH;
use tracing_subscriber::EnvFilter;

use crate::extractors::DebugLogTarget;

pub const DEFAULT_DEBUG_LOG_PATH: &str = "/var/log/mount-helper-container-debug.log";
pub const DEFAULT_JOURNAL_UNIT: &str = "mount-helper-container";

const DEFAULT_LOG_FILTER: &str = "mount_helper_server=info,tower_http=info";

#[derive(ValueEnum, PartialEq, Eq, Clone, Copy, Debug)]
pub enum LogFormat {
	Pretty,
	Json,
}

/// Privileged helper running mount tooling for unprivileged callers over a unix socket.
#[derive(Parser, Clone, Debug)]
#[command(name = "mount-helper-server", version, about)]
pub struct Config {
	/// Unix socket to serve on, recreated on every start.
	#[arg(long, env = "MOUNT_HELPER_SOCKET", default_value = DEFAULT_SOCKET_PATH)]
	pub socket_path: PathBuf,

	/// File the debug-log endpoint writes collected logs to.
	#[arg(long, env = "MOUNT_HELPER_DEBUG_LOG", default_value = DEFAULT_DEBUG_LOG_PATH)]
	pub debug_log_path: PathBuf,

	/// Systemd unit whose journal is collected by the debug-log endpoint.
	#[arg(long, env = "MOUNT_HELPER_JOURNAL_UNIT", default_value = DEFAULT_JOURNAL_UNIT)]
	pub journal_unit: String,

	#[arg(long, env = "MOUNT_HELPER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
	pub log_format: LogFormat,
}

impl Config {
	pub fn debug_log_target(&self) -> DebugLogTarget {
		DebugLogTarget {
			path: self.debug_log_path.as_path().into(),
			journal_unit: self.journal_unit.as_str().into(),
		}
	}

	/// Installs the global subscriber, `RUST_LOG` overrides the default filter.
	pub fn init_tracing(&self) {
		let filter = EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

		match self.log_format {
			LogFormat::Pretty => tracing_subscriber::fmt()
				.with_env_filter(filter)
				.with_target(true)
				.init(),
			LogFormat::Json => tracing_subscriber::fmt()
				.json()
				.with_env_filter(filter)
				.with_current_span(false)
				.init(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::path::Path;

	#[test]
	fn defaults() {
		let config = Config::try_parse_from(["mount-helper-server"]).unwrap();

		assert_eq!(config.socket_path, Path::new("/var/lib/ibmshare.sock"));
		assert_eq!(config.debug_log_path, Path::new(DEFAULT_DEBUG_LOG_PATH));
		assert_eq!(config.journal_unit, DEFAULT_JOURNAL_UNIT);
		assert_eq!(config.log_format, LogFormat::Pretty);
	}

	#[test]
	fn flags() {
		let config = Config::try_parse_from([
			"mount-helper-server",
			"--socket-path", "/tmp/mysocket.sock",
			"--debug-log-path", "/tmp/debug.log",
			"--journal-unit", "ibm-mount-helper",
			"--log-format", "json",
		]).unwrap();

		assert_eq!(config.socket_path, Path::new("/tmp/mysocket.sock"));
		assert_eq!(config.log_format, LogFormat::Json);

		let target = config.debug_log_target();
		assert_eq!(&*target.path, Path::new("/tmp/debug.log"));
		assert_eq!(&*target.journal_unit, "ibm-mount-helper");
	}

	#[test]
	fn unknown_log_format() {
		let result = Config::try_parse_from(["mount-helper-server", "--log-format", "xml"]);
		assert!(result.is_err());
	}
}
