//! Zip bundling of rendered diagrams.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::ArchiveError;

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644)
}

/// Write `files` into a zip archive at `dest`.
///
/// Entries are stored flat under their file names, in the order given.
pub fn write_zip(files: &[PathBuf], dest: &Path) -> Result<(), ArchiveError> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(dest)?));

    for path in files {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ArchiveError::InvalidName(path.clone()))?;

        zip.start_file(name, entry_options())?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut zip)?;
    }

    zip.finish()?;
    tracing::debug!(entries = files.len(), path = %dest.display(), "Wrote diagram archive");
    Ok(())
}
