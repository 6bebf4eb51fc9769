#![forbid(unsafe_code)]
#![deny(non_snake_case)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mount_helper_client::MountHelperClient;
use mount_helper_shared::{MountRequest, DEFAULT_SOCKET_PATH};
use tracing_subscriber::EnvFilter;

/// Sends a single request to the mount helper service.
#[derive(Parser, Debug)]
#[command(name = "mount-helper", version, about)]
struct Cli {
	#[arg(long, env = "MOUNT_HELPER_SOCKET", default_value = DEFAULT_SOCKET_PATH)]
	socket_path: PathBuf,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Mount SOURCE at TARGET.
	Mount {
		source: String,
		target: String,
		#[arg(long, short = 't', default_value = "ibmshare")]
		fs_type: String,
		#[arg(long, default_value = "")]
		request_id: String,
	},
	/// Unmount TARGET.
	Umount {
		target: String,
	},
	/// Check whether TARGET is a mount point.
	Status {
		target: String,
	},
	/// Check whether the service is running.
	Live,
	/// Have the service dump its journal to its debug-log file.
	DebugLogs {
		#[arg(long, default_value = "")]
		request_id: String,
	},
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| EnvFilter::new("mount_helper_client=warn")))
		.with_writer(std::io::stderr)
		.init();

	let client = MountHelperClient::new(cli.socket_path);

	let message = match cli.command {
		Command::Mount { source, target, fs_type, request_id } => {
			client.mount(&MountRequest {
				source_path: source,
				target_path: target,
				fs_type,
				request_id,
			}).await?.message
		},
		Command::Umount { target } => client.umount(&target).await?.message,
		Command::Status { target } => client.mount_status(&target).await?,
		Command::Live => client.is_live().await?.message,
		Command::DebugLogs { request_id } => client.collect_debug_logs(&request_id).await?.message,
	};

	println!("{message}");

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mount_arguments() {
		let cli = Cli::try_parse_from(["mount-helper", "--socket-path", "/tmp/mysocket.sock", "mount", "fs1235", "/test", "-t", "ext4"]).unwrap();
		assert_eq!(cli.socket_path, PathBuf::from("/tmp/mysocket.sock"));

		let Command::Mount { source, target, fs_type, request_id } = cli.command else {panic!()};
		assert_eq!(source, "fs1235");
		assert_eq!(target, "/test");
		assert_eq!(fs_type, "ext4");
		assert_eq!(request_id, "");
	}

	#[test]
	fn missing_subcommand() {
		assert!(Cli::try_parse_from(["mount-helper"]).is_err());
	}
}
