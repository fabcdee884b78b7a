//! Local SSH client configuration synchronisation.
//!
//! Ensures the config file contains exactly one up-to-date host block per
//! instance without disturbing unrelated blocks. The file is treated as
//! exclusively owned for the duration of a call; concurrent invocations
//! against the same file race (last writer wins).

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

mod scrub;

pub use scrub::{ScrubState, host_block, is_host_declaration, rewrite, scrub_step, strip_host_block};

/// Errors raised while updating the SSH configuration file.
#[derive(Debug, Error)]
pub enum SshConfigError {
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the configured path lacks a parent directory or file name.
    #[error("invalid SSH config path: {path}")]
    InvalidPath {
        /// Offending path.
        path: Utf8PathBuf,
    },
}

/// Handle onto the SSH client configuration file.
#[derive(Clone, Debug)]
pub struct SshConfigFile {
    path: Utf8PathBuf,
}

impl SshConfigFile {
    /// Creates a handle for the given path.
    #[must_use]
    pub const fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    /// Creates a handle from a configured path, expanding a leading `~/`.
    #[must_use]
    pub fn from_configured(path: &str) -> Self {
        Self::new(Utf8PathBuf::from(expand_tilde(path)))
    }

    /// Returns the config file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Ensures the file contains exactly one up-to-date block for `host`,
    /// pointing at `address`.
    ///
    /// A missing file is treated as empty and created by the write-back. The
    /// rewrite goes through a temporary file renamed over the original, so a
    /// mid-write failure cannot truncate existing content.
    ///
    /// # Errors
    ///
    /// Returns [`SshConfigError::Io`] when the file or its directory cannot
    /// be accessed, and [`SshConfigError::InvalidPath`] when the path lacks a
    /// parent directory or file name.
    pub fn update(&self, host: &str, address: &str) -> Result<(), SshConfigError> {
        let (dir, file_name) = self.open_parent()?;
        let existing = self.read_existing(&dir, file_name)?;
        let updated = rewrite(&existing, host, address);
        self.write_replace(&dir, file_name, &updated)
    }

    fn open_parent(&self) -> Result<(Dir, &str), SshConfigError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| SshConfigError::InvalidPath {
                path: self.path.clone(),
            })?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| SshConfigError::InvalidPath {
                path: self.path.clone(),
            })?;
        let dir =
            Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| SshConfigError::Io {
                path: parent.to_path_buf(),
                message: err.to_string(),
            })?;
        Ok((dir, file_name))
    }

    fn read_existing(&self, dir: &Dir, file_name: &str) -> Result<String, SshConfigError> {
        match dir.read_to_string(file_name) {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(SshConfigError::Io {
                path: self.path.clone(),
                message: err.to_string(),
            }),
        }
    }

    fn write_replace(
        &self,
        dir: &Dir,
        file_name: &str,
        contents: &str,
    ) -> Result<(), SshConfigError> {
        let tmp_name = format!(".{file_name}.gantry-tmp");
        dir.write(&tmp_name, contents)
            .map_err(|err| SshConfigError::Io {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        dir.rename(&tmp_name, dir, file_name)
            .map_err(|err| SshConfigError::Io {
                path: self.path.clone(),
                message: err.to_string(),
            })
    }
}

/// Expands a leading `~/` prefix to the user's home directory.
///
/// If the `HOME` environment variable is not set, the function returns the
/// input string unchanged (i.e., the leading `~` is not expanded). Callers
/// should handle this case if they need a different fallback.
///
/// # Examples
///
/// ```
/// # use gantry::ssh_config::expand_tilde;
/// let home = std::env::var("HOME").expect("HOME should be set");
/// assert_eq!(expand_tilde("~/.ssh/config"), format!("{home}/.ssh/config"));
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return format!("{}/{rest}", home.to_string_lossy());
    }
    path.to_owned()
}
