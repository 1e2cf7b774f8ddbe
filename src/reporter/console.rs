//! Console reporter with colored output

use super::html::format_size;
use crate::{ArtifactRecord, Document, GroupSection};
use colored::Colorize;
use std::fmt::Write;
use std::path::Path;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output (timestamps and digests)
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print the per-group summary and the report location
    pub fn report(&self, doc: &Document, report_path: &Path) {
        print!("{}", self.render(doc));
        println!("   Report: {}", self.paint_bold(&report_path.display().to_string()));
        println!();
    }

    /// Report in quiet mode (just the path)
    pub fn report_quiet(&self, report_path: &Path) {
        println!("{}", report_path.display());
    }

    /// Summary text for a document
    pub fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        let total = doc.artifact_count();
        let present = doc.present_count();

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.paint_bold(&format!("Artifact Report: {}", doc.title)));
        let _ = writeln!(
            out,
            "   {} expected | {} present | {} missing",
            total,
            present,
            total - present
        );
        let _ = writeln!(out);

        for section in &doc.groups {
            self.render_group(&mut out, section);
        }
        out
    }

    fn render_group(&self, out: &mut String, section: &GroupSection) {
        let _ = writeln!(
            out,
            "   {} ({}/{})",
            self.paint_bold(&section.group.id),
            section.present_count(),
            section.records.len()
        );
        let width = section
            .records
            .iter()
            .map(|r| r.id().len())
            .max()
            .unwrap_or(0);

        for record in &section.records {
            self.render_record(out, record, width);
        }
        let _ = writeln!(out);
    }

    fn render_record(&self, out: &mut String, record: &ArtifactRecord, width: usize) {
        if !record.present {
            let _ = writeln!(
                out,
                "     {} {:<width$}  {}",
                self.paint_missing("✗"),
                record.id(),
                self.paint_dim("not present"),
                width = width
            );
            return;
        }

        let _ = writeln!(
            out,
            "     {} {:<width$}  {}  {}",
            self.paint_present("✓"),
            record.id(),
            record.file_name.as_deref().unwrap_or(""),
            self.paint_dim(&format_size(record.size_bytes.unwrap_or(0))),
            width = width
        );
        if self.verbose {
            if let Some(modified) = record.last_modified {
                let _ = writeln!(out, "       modified {}", modified.to_rfc3339());
            }
            if let Some(digest) = &record.sha256 {
                let _ = writeln!(out, "       sha256   {}", digest);
            }
        }
    }

    fn paint_bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_dim(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_present(&self, s: &str) -> String {
        if self.use_colors {
            s.green().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_missing(&self, s: &str) -> String {
        if self.use_colors {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
