//! Tool configuration and default header resolution.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File name of the header the firmware includes.
pub const DEFAULT_HEADER_FILE: &str = "camera_index.h";

/// Environment variable that overrides the default header location.
pub const HEADER_ENV: &str = "CAMIDX_HEADER";

/// Options shared by the extract and embed operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolConfig {
    /// Header to operate on. `None` means the colocated default.
    pub header_path: Option<PathBuf>,
    /// Directory for extracted HTML. `None` means the header's directory.
    pub out_dir: Option<PathBuf>,
    /// Patch the header instead of printing the block.
    pub inplace: bool,
}

impl ToolConfig {
    /// Config targeting an explicit header.
    pub fn with_header(path: impl Into<PathBuf>) -> Self {
        Self {
            header_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// The header to operate on.
    pub fn header_path(&self) -> Result<PathBuf> {
        match &self.header_path {
            Some(path) => Ok(path.clone()),
            None => default_header_path(),
        }
    }

    /// Directory extracted pages are written to.
    pub fn output_dir(&self, header: &Path) -> PathBuf {
        match &self.out_dir {
            Some(dir) => dir.clone(),
            None => header
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        }
    }
}

/// `camera_index.h` in the directory of the running executable.
pub fn default_header_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(Error::ExecutableDir)?;
    let dir = exe.parent().ok_or_else(|| {
        Error::ExecutableDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "executable has no parent directory",
        ))
    })?;
    Ok(dir.join(DEFAULT_HEADER_FILE))
}
