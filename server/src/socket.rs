use std::{fs, io::ErrorKind, os::unix::fs::{FileTypeExt, PermissionsExt}, path::{Path, PathBuf}};

use anyhow::{bail, Context};
use tokio::{net::UnixListener, signal::unix::{signal, SignalKind}};
use tracing::{debug, error, info, warn};

const SOCKET_MODE: u32 = 0o660;

/// Owns the socket file of a bound listener and removes it when dropped.
#[derive(Debug)]
pub struct SocketGuard {
	path: PathBuf,
}

impl SocketGuard {
	/// Binds a fresh listener at `path`, replacing a socket file left over by a previous run.
	///
	/// Anything at `path` that isn't a socket is left alone and fails the bind.
	pub fn bind(path: &Path) -> anyhow::Result<(UnixListener, Self)> {
		match fs::symlink_metadata(path) {
			Ok(metadata) if metadata.file_type().is_socket() => {
				fs::remove_file(path)
					.with_context(|| format!("failed removing stale socket {}", path.display()))?;
				info!(path = %path.display(), "removed stale socket");
			},
			Ok(_) => bail!("refusing to replace {}, it is not a socket", path.display()),
			Err(err) if err.kind() == ErrorKind::NotFound => (),
			Err(err) => return Err(err).with_context(|| format!("failed inspecting {}", path.display())),
		}

		if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
			fs::create_dir_all(parent)
				.with_context(|| format!("failed creating socket directory {}", parent.display()))?;
		}

		let listener = UnixListener::bind(path)
			.with_context(|| format!("failed binding unix socket {}", path.display()))?;
		let guard = Self {
			path: path.to_owned(),
		};

		if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(SOCKET_MODE)) {
			warn!(path = %path.display(), error = %err, "failed changing socket permissions");
		} else {
			debug!(path = %path.display(), mode = %format!("{SOCKET_MODE:o}"), "changed socket permissions");
		}

		info!(path = %path.display(), "listening on unix socket");

		Ok((listener, guard))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Drop for SocketGuard {
	fn drop(&mut self) {
		match fs::remove_file(&self.path) {
			Ok(()) => info!(path = %self.path.display(), "removed socket"),
			Err(err) if err.kind() == ErrorKind::NotFound => (),
			Err(err) => error!(path = %self.path.display(), error = %err, "failed removing socket"),
		}
	}
}

/// Resolves on the first SIGINT or SIGTERM.
pub async fn shutdown_signal() {
	let mut terminate = match signal(SignalKind::terminate()) {
		Ok(terminate) => terminate,
		Err(err) => {
			error!(error = %err, "failed installing SIGTERM handler");
			let _ = tokio::signal::ctrl_c().await;
			return;
		},
	};

	tokio::select! {
		_ = tokio::signal::ctrl_c() => info!("received SIGINT"),
		_ = terminate.recv() => info!("received SIGTERM"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn replaces_stale_socket() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("ibmshare.sock");
		// a listener dropped without cleanup leaves its socket file behind
		drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
		assert!(path.exists());

		let (_listener, guard) = SocketGuard::bind(&path).unwrap();
		assert_eq!(guard.path(), path);

		let metadata = fs::metadata(&path).unwrap();
		assert!(metadata.file_type().is_socket());
		assert_eq!(metadata.permissions().mode() & 0o777, SOCKET_MODE);
	}

	#[tokio::test]
	async fn removed_on_drop() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("nested").join("ibmshare.sock");

		let (listener, guard) = SocketGuard::bind(&path).unwrap();
		assert!(path.exists());

		drop(listener);
		drop(guard);
		assert!(!path.exists());
	}

	#[tokio::test]
	async fn keeps_regular_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("ibmshare.sock");
		fs::write(&path, "not a socket").unwrap();

		let err = SocketGuard::bind(&path).unwrap_err();
		assert!(err.to_string().contains("is not a socket"), "{err}");
		assert_eq!(fs::read_to_string(&path).unwrap(), "not a socket");
	}

	#[tokio::test]
	async fn keeps_directory() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("occupied");
		fs::create_dir(&path).unwrap();

		let err = SocketGuard::bind(&path).unwrap_err();
		assert!(err.to_string().contains("is not a socket"), "{err}");
		assert!(path.is_dir());
	}
}
