use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::InputError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Output path for a converted artifact
    // @params: input_file, output_dir, suffix, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: Option<&str>,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        if let Some(suffix) = suffix {
            output_filename.push('.');
            output_filename.push_str(suffix);
        }
        output_filename.push('.');
        output_filename.push_str(extension);

        output_dir.join(output_filename)
    }

    /// Find files with a specific extension directly inside a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Find numbered artifacts (`name_<n>.<ext>`) ordered by their number
    ///
    /// Files without a trailing number sort after the numbered ones, by name.
    pub fn find_numbered_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow!("Artifact directory does not exist: {}", dir.display()));
        }

        let mut files = Self::find_files(dir, extension)?;
        files.sort_by_key(|path| (Self::trailing_number(path).unwrap_or(u64::MAX), path.clone()));
        Ok(files)
    }

    /// The number after the last underscore of a file stem
    pub fn trailing_number(path: &Path) -> Option<u64> {
        path.file_stem()?
            .to_str()?
            .rsplit('_')
            .next()?
            .parse()
            .ok()
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|source| {
            InputError::Read {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(path, content).map_err(|source| {
            InputError::Write {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// Absolute form of a path, without touching the filesystem
    pub fn absolute<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        std::path::absolute(path.as_ref())
            .with_context(|| format!("Failed to resolve path: {}", path.as_ref().display()))
    }
}
