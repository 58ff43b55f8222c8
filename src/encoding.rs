//! Encoding detection and line scanning module
//!
//! Opens source files, detects their encoding and yields decoded lines one at
//! a time. Undecodable bytes are replaced instead of aborting the scan.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Bytes sampled for encoding detection
const SAMPLE_SIZE: usize = 64 * 1024;

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// Confidence level (0.0 - 1.0)
    pub confidence: f32,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            confidence: 1.0,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Detect the encoding of a file by sampling its content
pub fn detect_encoding(path: &Path) -> Result<EncodingInfo> {
    let file = File::open(path).map_err(|e| ConvertError::file_access(path, e))?;
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    file.take(SAMPLE_SIZE as u64)
        .read_to_end(&mut sample)
        .map_err(|e| ConvertError::file_access(path, e))?;

    Ok(detect_sample(&sample))
}

/// Detect the encoding of an in-memory sample
pub fn detect_sample(sample: &[u8]) -> EncodingInfo {
    if sample.is_empty() {
        return EncodingInfo::default();
    }

    // BOM wins over heuristics
    if let Some(encoding) = detect_bom(sample) {
        return EncodingInfo {
            name: encoding.name(),
            confidence: 1.0,
            encoding,
        };
    }

    // Pure ASCII and valid UTF-8 need no guessing. A sequence cut off at the
    // end of the sample still counts as valid.
    match std::str::from_utf8(sample) {
        Ok(_) => return EncodingInfo::default(),
        Err(e) if e.error_len().is_none() => return EncodingInfo::default(),
        Err(_) => {}
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    let encoding = detector.guess(None, true);

    let confidence = if encoding == encoding_rs::UTF_8 { 0.5 } else { 0.8 };

    EncodingInfo {
        name: encoding.name(),
        confidence,
        encoding,
    }
}

/// Detect BOM (Byte Order Mark) at the start of content
fn detect_bom(content: &[u8]) -> Option<&'static Encoding> {
    if content.len() >= 3 && content[0..3] == [0xEF, 0xBB, 0xBF] {
        return Some(encoding_rs::UTF_8);
    }
    if content.len() >= 2 {
        if content[0..2] == [0xFE, 0xFF] {
            return Some(encoding_rs::UTF_16BE);
        }
        if content[0..2] == [0xFF, 0xFE] {
            return Some(encoding_rs::UTF_16LE);
        }
    }
    None
}

/// Lazy, single-pass iterator over the decoded lines of a source file
///
/// Opening fails immediately if the file is missing or unreadable, so callers
/// learn about a bad path before any processing starts. A second pass needs a
/// fresh scanner.
pub struct LineScanner {
    reader: BufReader<DecodeReaderBytes<File, Vec<u8>>>,
    path: PathBuf,
    encoding: &'static Encoding,
    file_size: u64,
    line_buffer: Vec<u8>,
    lines_read: u64,
    lossy_lines: u64,
}

impl LineScanner {
    /// Open a source file, detecting its encoding
    pub fn open(path: &Path) -> Result<Self> {
        let info = detect_encoding(path)?;
        log::debug!(
            "Detected {} for {:?} (confidence {:.1})",
            info.name,
            path,
            info.confidence
        );
        Self::with_encoding(path, info.encoding)
    }

    /// Open a source file with a known encoding
    pub fn with_encoding(path: &Path, encoding: &'static Encoding) -> Result<Self> {
        let file = File::open(path).map_err(|e| ConvertError::file_access(path, e))?;
        let file_size = file
            .metadata()
            .map_err(|e| ConvertError::file_access(path, e))?
            .len();

        // Transcodes other encodings to UTF-8 and strips any BOM. UTF-8 input
        // passes through untouched so invalid bytes reach the lossy path below.
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .utf8_passthru(true)
            .strip_bom(true)
            .build(file);

        Ok(Self {
            reader: BufReader::with_capacity(SAMPLE_SIZE, decoder),
            path: path.to_path_buf(),
            encoding,
            file_size,
            line_buffer: Vec::with_capacity(4096),
            lines_read: 0,
            lossy_lines: 0,
        })
    }

    /// Get the encoding used for decoding
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Size of the source file in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Lines produced so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Lines that needed lossy conversion
    pub fn lossy_lines(&self) -> u64 {
        self.lossy_lines
    }
}

impl Iterator for LineScanner {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buffer.clear();

        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => None,
            Ok(_) => {
                while self.line_buffer.last() == Some(&b'\n')
                    || self.line_buffer.last() == Some(&b'\r')
                {
                    self.line_buffer.pop();
                }
                self.lines_read += 1;

                match std::str::from_utf8(&self.line_buffer) {
                    Ok(s) if !s.contains(char::REPLACEMENT_CHARACTER) => Some(Ok(s.to_string())),
                    Ok(s) => {
                        // Bytes the source encoding could not map
                        self.lossy_lines += 1;
                        log::warn!(
                            "Undecodable bytes on line {} of {:?}, replaced",
                            self.lines_read,
                            self.path
                        );
                        Some(Ok(s.to_string()))
                    }
                    Err(_) => {
                        self.lossy_lines += 1;
                        log::warn!(
                            "Invalid UTF-8 on line {} of {:?}, using lossy conversion",
                            self.lines_read,
                            self.path
                        );
                        Some(Ok(String::from_utf8_lossy(&self.line_buffer).into_owned()))
                    }
                }
            }
            Err(e) => Some(Err(ConvertError::file_access(&self.path, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_utf8_detection() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Hello, World!").unwrap();
        writeln!(file, "Привет мир!").unwrap();

        let info = detect_encoding(file.path()).unwrap();
        assert_eq!(info.name, "UTF-8");
    }

    #[test]
    fn test_bom_detection() {
        assert_eq!(detect_sample(&[0xFF, 0xFE, b'a', 0]).encoding, encoding_rs::UTF_16LE);
        assert_eq!(detect_sample(&[0xEF, 0xBB, 0xBF, b'a']).encoding, encoding_rs::UTF_8);
        assert_eq!(detect_sample(b"").name, "UTF-8");
    }

    #[test]
    fn test_line_scanner() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "line1").unwrap();
        write!(file, "line2\r\n").unwrap();
        write!(file, "line3").unwrap();

        let mut scanner = LineScanner::open(file.path()).unwrap();
        let lines: Vec<_> = scanner.by_ref().filter_map(|r| r.ok()).collect();

        assert_eq!(lines, vec!["line1", "line2", "line3"]);
        assert_eq!(scanner.lines_read(), 3);
    }

    #[test]
    fn test_line_scanner_strips_bom() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
        file.write_all(b"first\nsecond\n").unwrap();

        let lines: Vec<_> = LineScanner::open(file.path())
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_line_scanner_decodes_utf16() {
        let mut file = NamedTempFile::new().unwrap();
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "abc\ndef\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        file.write_all(&bytes).unwrap();

        let lines: Vec<_> = LineScanner::open(file.path())
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert_eq!(lines, vec!["abc", "def"]);
    }

    #[test]
    fn test_line_scanner_counts_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        // Enough valid lines that the detection sample is plain UTF-8
        for i in 0..8000 {
            writeln!(file, "line {:05}", i).unwrap();
        }
        file.write_all(b"bad \xFF\xFE byte d41d8cd98f00b204e9800998ecf8427e\n").unwrap();

        let mut scanner = LineScanner::open(file.path()).unwrap();
        let lines: Vec<_> = scanner.by_ref().filter_map(|r| r.ok()).collect();

        assert_eq!(scanner.encoding(), encoding_rs::UTF_8);
        assert_eq!(scanner.lines_read(), 8001);
        assert_eq!(scanner.lossy_lines(), 1);
        assert_eq!(
            lines.last().unwrap(),
            "bad \u{FFFD}\u{FFFD} byte d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_line_scanner_clean_file_has_no_lossy_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Привет d41d8cd98f00b204e9800998ecf8427e").unwrap();

        let mut scanner = LineScanner::open(file.path()).unwrap();
        assert_eq!(scanner.by_ref().count(), 1);
        assert_eq!(scanner.lossy_lines(), 0);
    }

    #[test]
    fn test_line_scanner_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LineScanner::open(&dir.path().join("NSRLFile.txt")).err().unwrap();

        assert!(matches!(err, ConvertError::FileAccess { .. }));
    }

    #[test]
    fn test_line_scanner_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let mut scanner = LineScanner::open(file.path()).unwrap();

        assert!(scanner.next().is_none());
        assert_eq!(scanner.file_size(), 0);
    }
}
