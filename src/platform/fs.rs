// LogTab - platform/fs.rs
//
// Filesystem helpers: lossy whole-file reads and atomic output writes.

use crate::util::constants::TEMP_OUTPUT_SUFFIX;
use crate::util::error::ExportError;
use std::ffi::OsString;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Sibling temp path used while `path` is being written (`out.csv.tmp`).
pub fn temp_path_for(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => {
            let mut tmp_name = OsString::from(name);
            tmp_name.push(".");
            tmp_name.push(TEMP_OUTPUT_SUFFIX);
            path.with_file_name(tmp_name)
        }
        None => path.with_extension(TEMP_OUTPUT_SUFFIX),
    }
}

/// Write `path` atomically (write temp -> rename).
///
/// Creates parent directories as needed. `write` receives a buffered writer
/// over the temp file. If `write`, the flush, or the rename fails, the temp
/// file is removed and `path` is left untouched.
pub fn write_atomic<T, F>(path: &Path, write: F) -> Result<T, ExportError>
where
    F: FnOnce(&mut BufWriter<std::fs::File>) -> Result<T, ExportError>,
{
    let io_err = |p: &Path, e: io::Error| ExportError::Io {
        path: p.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
    }

    let tmp = temp_path_for(path);
    let file = std::fs::File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
    let mut writer = BufWriter::new(file);

    let finish = |writer: &mut BufWriter<std::fs::File>| -> Result<T, ExportError> {
        let value = write(writer)?;
        writer.flush().map_err(|e| io_err(&tmp, e))?;
        Ok(value)
    };

    let value = match finish(&mut writer) {
        Ok(value) => value,
        Err(e) => {
            drop(writer);
            // Clean up the temp file on failure; ignore any secondary error.
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
    };
    drop(writer);

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        io_err(path, e)
    })?;

    tracing::debug!(path = %path.display(), "Output written");
    Ok(value)
}
