use anyhow::{anyhow, Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::encoding::{self, OutputEncoding};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Read a text file of any supported encoding into a string
    pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        debug!("Read {} bytes from {:?} ({:?})", bytes.len(), path, encoding::detect(&bytes));
        Ok(encoding::decode(&bytes))
    }

    /// Write text in the given encoding, creating parent directories
    pub fn write_text<P: AsRef<Path>>(path: P, content: &str, encoding: OutputEncoding) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(path, encoding.encode(content))
            .with_context(|| format!("Failed to write to file: {:?}", path))?;

        Ok(())
    }

    /// Copy `path` to `path.bak`, returning the backup location
    pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(anyhow!("Source file does not exist: {:?}", path));
        }

        let mut backup = path.as_os_str().to_owned();
        backup.push(".bak");
        let backup = PathBuf::from(backup);

        fs::copy(path, &backup)
            .with_context(|| format!("Failed to back up {:?} to {:?}", path, backup))?;

        Ok(backup)
    }
}
