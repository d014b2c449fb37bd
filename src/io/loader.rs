use std::fs;
use std::path::Path;

use anyhow::Context;
use log::trace;

/// Source and sink of whole files. Motion files are small, so they are always read into memory before decoding.
pub trait RawFileLoader {
    fn load_raw_owned(&self, path: &Path) -> Result<Vec<u8>, anyhow::Error>;

    fn store_raw(&self, path: &Path, data: &[u8]) -> Result<(), anyhow::Error>;
}

pub struct FsLoader {}

impl RawFileLoader for FsLoader {
    fn load_raw_owned(&self, path: &Path) -> Result<Vec<u8>, anyhow::Error> {
        let buf = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        trace!("Loaded {} ({} bytes)", path.display(), buf.len());
        Ok(buf)
    }

    fn store_raw(&self, path: &Path, data: &[u8]) -> Result<(), anyhow::Error> {
        fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))?;
        trace!("Stored {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}
