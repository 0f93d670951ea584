//! Streamed entry copy

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::common::fs::ensure_parent_dir;
use crate::error::Result;
use crate::error::archive::corrupt;
use crate::error::fs::io_failure;

const BUFFER_SIZE: usize = 64 * 1024;

/// Copy `reader` into the file `target`, creating parent directories
///
/// A symlink already at `target` is replaced rather than written through.
/// A read failure is reported as a corrupt archive and leaves the partly
/// written file in place.
pub fn stream_to_file(reader: &mut dyn Read, entry: &str, target: &Path) -> Result<u64> {
    ensure_parent_dir(target)?;
    if fs::symlink_metadata(target).is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(target).map_err(|e| io_failure(target, e))?;
    }

    let mut file = File::create(target).map_err(|e| io_failure(target, e))?;
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(corrupt(entry, e)),
        };
        file.write_all(&buffer[..read])
            .map_err(|e| io_failure(target, e))?;
        total += read as u64;
    }
    Ok(total)
}
