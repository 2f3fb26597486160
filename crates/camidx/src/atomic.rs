//! Atomic file replacement.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Replace `path` with `data` so readers see either the old or the new file.
///
/// The data goes to a temporary sibling first, is synced, and is then renamed
/// over the target. On any failure the temporary file is removed and the
/// target is left as it was. Permissions of an existing target are kept.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = temp_sibling(path);

    let result = write_synced(&tmp, data, path).and_then(|()| {
        fs::rename(&tmp, path).map_err(Error::io(path))
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_synced(tmp: &Path, data: &[u8], target: &Path) -> Result<()> {
    let mut file = File::create(tmp).map_err(Error::io(tmp))?;
    file.write_all(data).map_err(Error::io(tmp))?;
    file.sync_all().map_err(Error::io(tmp))?;

    if let Ok(meta) = fs::metadata(target) {
        fs::set_permissions(tmp, meta.permissions()).map_err(Error::io(tmp))?;
    }
    Ok(())
}

/// `.<name>.<pid>.tmp` in the same directory, so the rename stays on one filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "header".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}
