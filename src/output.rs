//! Output management module
//!
//! Writes canonical hash lists: one hash per line, `\n` terminated, replacing
//! whatever the file held before.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Default buffer size for file writing (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Conventional location of the generated hash list
pub const DEFAULT_OUTPUT_PATH: &str = "src/NSRLFile.txt";

/// Output file writer with buffering
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: u64,
    bytes_written: u64,
}

impl OutputWriter {
    /// Create a new output writer, truncating any existing file
    pub fn new(path: PathBuf, buffer_size: usize) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| ConvertError::output(&path, e))?;

        let writer = BufWriter::with_capacity(buffer_size, file);

        Ok(Self {
            writer,
            path,
            lines_written: 0,
            bytes_written: 0,
        })
    }

    /// Write a line to the output
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| ConvertError::output(&self.path, e))?;
        self.lines_written += 1;
        self.bytes_written += line.len() as u64 + 1; // +1 for newline
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ConvertError::output(&self.path, e))
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get number of lines written
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Get bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Write a complete hash list to `path`
///
/// Returns the number of lines written.
pub fn write_hash_list(path: &Path, hashes: &[String], buffer_size: usize) -> Result<u64> {
    if let Some(parent) = path.parent() {
        ensure_output_dir(parent)?;
    }

    let mut writer = OutputWriter::new(path.to_path_buf(), buffer_size)?;
    for hash in hashes {
        writer.write_line(hash)?;
    }
    writer.flush()?;

    log::debug!(
        "Wrote {} hashes ({} bytes) to {:?}",
        writer.lines_written(),
        writer.bytes_written(),
        writer.path()
    );

    Ok(writer.lines_written())
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| ConvertError::output(path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_writer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.txt");

        let mut writer = OutputWriter::new(path.clone(), 1024).unwrap();
        writer.write_line("D41D8CD98F00B204E9800998ECF8427E").unwrap();
        writer.write_line("0CC175B9C0F1B6A831C399E269772661").unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.lines_written(), 2);
        assert_eq!(writer.bytes_written(), 66);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "D41D8CD98F00B204E9800998ECF8427E\n0CC175B9C0F1B6A831C399E269772661\n"
        );
    }

    #[test]
    fn test_write_hash_list_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("NSRLFile.txt");
        std::fs::write(&path, "old content that is much longer than the new list\n").unwrap();

        let hashes = vec!["A".repeat(32)];
        let written = write_hash_list(&path, &hashes, DEFAULT_BUFFER_SIZE).unwrap();

        assert_eq!(written, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{}\n", "A".repeat(32)));
    }

    #[test]
    fn test_write_hash_list_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("src").join("NSRLFile.txt");

        write_hash_list(&path, &[], DEFAULT_BUFFER_SIZE).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
