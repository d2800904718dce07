//! Temporary files that bridge an in-memory upload to a path-based engine.
//!
//! Every request gets its own reference and output file, created up front
//! under the work dir with a fresh request id and a random part in the name,
//! so concurrent sessions never read, overwrite or delete each other's audio.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempPath;
use uuid::Uuid;

/// Suffix of the per-request reference sample file.
pub const REFERENCE_SUFFIX: &str = "temp_reference.wav";
/// Suffix of the per-request engine output file.
pub const OUTPUT_SUFFIX: &str = "output_clone.wav";

/// The pair of temp files owned by one generation request.
///
/// Whatever still exists is removed on drop.
#[derive(Debug)]
pub struct RequestFiles {
    id: Uuid,
    reference: TempPath,
    output: TempPath,
}

impl RequestFiles {
    /// Create both files, empty, under `work_dir`.
    pub fn new(work_dir: &Path) -> io::Result<Self> {
        let id = Uuid::new_v4();
        let prefix = format!("{}_", id.simple());
        let create = |suffix: &str| {
            tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(&format!("_{suffix}"))
                .tempfile_in(work_dir)
                .map(|file| file.into_temp_path())
        };
        Ok(Self {
            id,
            reference: create(REFERENCE_SUFFIX)?,
            output: create(OUTPUT_SUFFIX)?,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn reference_path(&self) -> &Path {
        &self.reference
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Write the reference bytes verbatim, replacing any earlier content.
    pub fn write_reference(&self, bytes: &[u8]) -> io::Result<()> {
        fs::write(&self.reference, bytes)
    }

    /// Read the engine's output fully into memory.
    pub fn read_output(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.output)
    }

    /// Remove both files, checking each one individually.
    ///
    /// Missing files are skipped. Removal errors are logged and otherwise
    /// ignored so cleanup never masks the error that triggered it.
    pub fn cleanup(&self) {
        for path in [self.reference_path(), self.output_path()] {
            if !path.exists() {
                continue;
            }
            match fs::remove_file(path) {
                Ok(()) => log::debug!("Removed {}", path.display()),
                Err(e) => log::warn!("Failed to remove {}: {e}", path.display()),
            }
        }
    }
}
