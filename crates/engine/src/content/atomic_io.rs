use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes through a sibling `.partial` file so readers never see a torn file.
pub(crate) fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let partial = partial_path_for(path);
    fs::write(&partial, bytes)?;
    if let Err(error) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(error);
    }
    Ok(())
}

fn partial_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "asset".into());
    name.push(".partial");
    path.with_file_name(name)
}
