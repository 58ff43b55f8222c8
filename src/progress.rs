//! Progress display module
//!
//! Styled console output, progress sinks and run statistics. The conversion
//! core only talks to [`ProgressSink`], so it runs without a terminal.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::matcher::HashAlgorithm;

/// Default number of records between progress updates
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1000;

/// Color theme for the tool
pub mod theme {
    use colored::Color;

    pub const PRIMARY: Color = Color::Green;
    pub const ACCENT: Color = Color::Cyan;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
}

/// Print the application banner
pub fn print_banner() {
    let banner = format!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                                                              ║
║   ███╗   ██╗███████╗██████╗ ██╗                              ║
║   ████╗  ██║██╔════╝██╔══██╗██║                              ║
║   ██╔██╗ ██║███████╗██████╔╝██║                              ║
║   ██║╚██╗██║╚════██║██╔══██╗██║                              ║
║   ██║ ╚████║███████║██║  ██║███████╗                         ║
║   ╚═╝  ╚═══╝╚══════╝╚═╝  ╚═╝╚══════╝   convert               ║
║                                                              ║
║          Canonical hash lists from text and CSV exports      ║
{}
╚══════════════════════════════════════════════════════════════╝
"#,
        banner_version_line()
    );

    println!("{}", banner.color(theme::PRIMARY));
}

/// Right-aligned package version inside the banner frame
fn banner_version_line() -> String {
    let version = format!("v{}", env!("CARGO_PKG_VERSION"));
    format!("║{:>57}     ║", version)
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".color(theme::PRIMARY), text.color(theme::PRIMARY).bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".color(theme::ACCENT), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".color(theme::WARNING), text.color(theme::WARNING));
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".color(theme::ERROR), text.color(theme::ERROR));
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled spinner for indeterminate progress
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Receives progress updates from the conversion core
pub trait ProgressSink {
    /// Called every N processed records with the running total
    fn update(&mut self, processed: u64);

    /// Called once when processing ends
    fn finish(&mut self, processed: u64);
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn update(&mut self, _processed: u64) {}

    fn finish(&mut self, _processed: u64) {}
}

/// Adapts a closure into a progress sink
pub struct CallbackProgress<F: FnMut(u64, bool)> {
    callback: F,
}

impl<F: FnMut(u64, bool)> CallbackProgress<F> {
    /// `callback(processed, finished)`
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(u64, bool)> ProgressSink for CallbackProgress<F> {
    fn update(&mut self, processed: u64) {
        (self.callback)(processed, false);
    }

    fn finish(&mut self, processed: u64) {
        (self.callback)(processed, true);
    }
}

/// Overwriting terminal counter
pub struct SpinnerProgress {
    bar: ProgressBar,
    label: String,
}

impl SpinnerProgress {
    pub fn new(label: &str) -> Self {
        Self {
            bar: create_spinner(&format!("{}: 0", label)),
            label: label.to_string(),
        }
    }
}

impl ProgressSink for SpinnerProgress {
    fn update(&mut self, processed: u64) {
        self.bar
            .set_message(format!("{}: {}", self.label, format_number(processed)));
    }

    fn finish(&mut self, processed: u64) {
        self.bar.finish_with_message(format!(
            "{}: {}",
            self.label,
            format_number(processed).green()
        ));
    }
}

/// Counts records and notifies a sink at a fixed cadence
pub struct ProgressReporter<'a> {
    sink: &'a mut dyn ProgressSink,
    interval: u64,
    count: u64,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink, interval: u64) -> Self {
        Self {
            sink,
            interval: interval.max(1),
            count: 0,
        }
    }

    /// Record one processed item
    #[inline]
    pub fn record(&mut self) {
        self.count += 1;
        if self.count % self.interval == 0 {
            self.sink.update(self.count);
        }
    }

    /// Report the final count
    pub fn finish(self) -> u64 {
        self.sink.finish(self.count);
        self.count
    }
}

/// Statistics for one conversion run
#[derive(Debug, Clone)]
pub struct ConversionStats {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: &'static str,
    pub input_bytes: u64,
    pub lines_scanned: u64,
    pub lossy_lines: u64,
    pub hashes_extracted: u64,
    pub duplicates_removed: u64,
    pub hashes_written: u64,
    pub algorithm: Option<HashAlgorithm>,
    pub dry_run: bool,
    pub start_time: Instant,
}

impl ConversionStats {
    pub fn new(input: PathBuf, output: PathBuf, mode: &'static str) -> Self {
        Self {
            input,
            output,
            mode,
            input_bytes: 0,
            lines_scanned: 0,
            lossy_lines: 0,
            hashes_extracted: 0,
            duplicates_removed: 0,
            hashes_written: 0,
            algorithm: None,
            dry_run: false,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn lines_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.lines_scanned as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        let title = if self.dry_run {
            "                 DRY RUN COMPLETE"
        } else {
            "                 CONVERSION COMPLETE"
        };

        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", title.green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        println!("  {} {:?} ({})", "Input:          ".green(), self.input, ByteSize(self.input_bytes));
        println!("  {} {}", "Mode:           ".green(), self.mode);
        if let Some(algorithm) = self.algorithm {
            println!("  {} {}", "Algorithm:      ".green(), algorithm);
        }
        println!();

        println!("  {} {}", "Lines scanned:  ".green(), format_number(self.lines_scanned));
        println!("  {} {}", "Hashes found:   ".green(), format_number(self.hashes_extracted));
        println!("  {} {}", "Duplicates:     ".yellow(), format_number(self.duplicates_removed));
        println!(
            "  {} {}",
            "Hashes written: ".green().bold(),
            format_number(self.hashes_written).green().bold()
        );

        if self.lossy_lines > 0 {
            println!("  {} {}", "Lossy lines:    ".red(), format_number(self.lossy_lines).red());
        }

        println!();
        println!("  {} {:?}", "Output:         ".green(), self.output);
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        println!("  {} {:.2} lines/sec", "Throughput:     ".green(), self.lines_per_second());
        println!();
        println!("{}", "═".repeat(60).green());
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}
